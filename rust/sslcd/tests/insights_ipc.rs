use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_sslcd");
    let mut child = Command::new(exe)
        .env_remove("SSLCD_CONFIG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn sslcd");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    assert!(!line.trim().is_empty(), "empty response for {}", method);
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    value
}

#[test]
fn insight_lines_follow_fixed_order() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let resp = request(
        &mut stdin,
        &mut reader,
        "1",
        "insights.generate",
        json!({
            "overallPercentage": 76.67,
            "failed": false,
            "subjectPercentages": [80.0, 60.0, 90.0]
        }),
    );
    assert_eq!(resp["ok"], true, "{}", resp);
    let lines: Vec<&str> = resp["result"]["insights"]
        .as_array()
        .expect("insights")
        .iter()
        .map(|v| v.as_str().expect("line"))
        .collect();
    assert_eq!(
        lines,
        vec![
            "The student has passed all subjects as per Karnataka SSLC board norms.",
            "Overall performance is good and qualifies for First Class.",
            "Highest subject percentage: 90.0%.",
            "Lowest subject percentage: 60.0%.",
        ]
    );

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn failed_flag_and_low_band() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let resp = request(
        &mut stdin,
        &mut reader,
        "1",
        "insights.generate",
        json!({
            "overallPercentage": 41.5,
            "failed": true,
            "subjectPercentages": [33.33, 49.6]
        }),
    );
    let lines = resp["result"]["insights"].as_array().expect("insights");
    assert_eq!(lines.len(), 4);
    assert_eq!(
        lines[0],
        "The student has failed in one or more subjects as per Karnataka SSLC rules."
    );
    assert_eq!(
        lines[1],
        "Minimum passing performance achieved. Needs improvement."
    );
    assert_eq!(lines[2], "Highest subject percentage: 49.6%.");
    assert_eq!(lines[3], "Lowest subject percentage: 33.33%.");

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn contract_violations_are_rejected() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let resp = request(
        &mut stdin,
        &mut reader,
        "1",
        "insights.generate",
        json!({ "overallPercentage": 50.0, "failed": false, "subjectPercentages": [] }),
    );
    assert_eq!(resp["ok"], false);
    assert_eq!(resp["error"]["code"], "insight_failed");

    let resp = request(
        &mut stdin,
        &mut reader,
        "2",
        "insights.generate",
        json!({ "overallPercentage": 50.0, "subjectPercentages": [50.0] }),
    );
    assert_eq!(resp["error"]["code"], "bad_params");
    assert_eq!(resp["error"]["message"], "failed must be a boolean");

    let resp = request(
        &mut stdin,
        &mut reader,
        "3",
        "insights.generate",
        json!({ "overallPercentage": 50.0, "failed": false, "subjectPercentages": [50.0, "x"] }),
    );
    assert_eq!(resp["error"]["code"], "bad_params");
    assert_eq!(resp["error"]["details"]["index"], 1);

    drop(stdin);
    let _ = child.wait();
}
