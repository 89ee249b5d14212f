use raspa_client::core::models::inputs::SimulationInputs;
use raspa_client::core::models::job::{JobHandle, JobState};
use raspa_client::engine::client::SimulationClient;
use raspa_client::engine::config::ClientConfigBuilder;
use raspa_client::engine::error::ClientError;
use std::fs;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tempfile::tempdir;

/// Accepts a single connection, captures the full request and answers with `response`.
fn serve_once(response: Vec<u8>) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        stream
            .set_read_timeout(Some(Duration::from_secs(10)))
            .unwrap();
        let request = read_request(&mut stream);
        stream.write_all(&response).unwrap();
        stream.flush().unwrap();
        String::from_utf8_lossy(&request).into_owned()
    });

    (base_url, handle)
}

fn read_request(stream: &mut TcpStream) -> Vec<u8> {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut buf).unwrap();
        assert!(n > 0, "client closed the connection before sending headers");
        data.extend_from_slice(&buf[..n]);
        if let Some(pos) = find(&data, b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&data[..header_end]).to_ascii_lowercase();
    let content_length = head
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .map(|value| value.trim().parse::<usize>().unwrap());
    let chunked = head.contains("transfer-encoding: chunked");

    loop {
        let body = &data[header_end..];
        let complete = match content_length {
            Some(len) => body.len() >= len,
            None if chunked => body.ends_with(b"0\r\n\r\n"),
            None => true,
        };
        if complete {
            break;
        }
        let n = stream.read(&mut buf).unwrap();
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buf[..n]);
    }
    data
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn json_response(status_line: &str, body: &str) -> Vec<u8> {
    format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status_line,
        body.len(),
        body
    )
    .into_bytes()
}

fn client(base_url: &str) -> SimulationClient {
    let config = ClientConfigBuilder::new()
        .base_url(base_url)
        .request_timeout(Some(Duration::from_secs(30)))
        .build()
        .unwrap();
    SimulationClient::connect(config).unwrap()
}

#[test]
fn submit_sends_a_multipart_form_and_reads_the_task_id() {
    let dir = tempdir().unwrap();
    let mut paths = Vec::new();
    for (name, content) in [
        ("force_field_mixing_rules.def", "general mixing rule\n"),
        ("pseudo_atoms.def", "# of pseudo atoms\n"),
        ("example_mof.cif", "data_IRMOF-1\n"),
        ("adsorbate.def", "# critical constants\n"),
        ("simulation.input", "NumberOfCycles 1000\n"),
    ] {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        paths.push(path);
    }
    let inputs = SimulationInputs::new(
        paths[0].clone(),
        paths[1].clone(),
        paths[2].clone(),
        paths[3].clone(),
        paths[4].clone(),
    );

    let (base_url, server) = serve_once(json_response(
        "202 Accepted",
        r#"{"task_id": "5f0c8e1a", "message": "Simulation started"}"#,
    ));

    let handle = client(&base_url).submit(&inputs, 4).unwrap();
    let request = server.join().unwrap();

    assert_eq!(handle, JobHandle::from("5f0c8e1a"));
    assert!(request.starts_with("POST /run_simulation HTTP/1.1"));
    assert!(request.to_ascii_lowercase().contains("multipart/form-data"));
    assert!(request.contains(r#"name="nproc""#));
    assert!(request.contains(r#"name="mof_cif"; filename="example_mof.cif""#));
    assert!(request.contains("data_IRMOF-1"));
    assert!(request.contains(r#"name="simulation_input"; filename="simulation.input""#));
}

#[test]
fn status_is_read_from_the_task_status_endpoint() {
    let (base_url, server) = serve_once(json_response(
        "200 OK",
        r#"{"status": "running", "log": ["Current cycle: 200 out of 1000\n"]}"#,
    ));

    let status = client(&base_url)
        .get_status(&JobHandle::from("abc"))
        .unwrap();
    let request = server.join().unwrap();

    assert!(request.starts_with("GET /task_status/abc HTTP/1.1"));
    assert_eq!(status.state, JobState::Running);
    assert_eq!(
        status.log_lines().collect::<Vec<_>>(),
        vec!["Current cycle: 200 out of 1000"]
    );
}

#[test]
fn task_id_is_percent_encoded_on_the_wire() {
    let (base_url, server) = serve_once(json_response("200 OK", r#"{"status": "queued"}"#));

    client(&base_url)
        .get_status(&JobHandle::from("run 1/2?x"))
        .unwrap();
    let request = server.join().unwrap();

    assert!(request.starts_with("GET /task_status/run%201%2F2%3Fx HTTP/1.1"));
}

#[test]
fn chunked_download_is_written_byte_for_byte() {
    let archive: Vec<u8> = (0..70_000u32).map(|i| (i % 253) as u8).collect();

    let mut response =
        b"HTTP/1.1 200 OK\r\nContent-Type: application/zip\r\nTransfer-Encoding: chunked\r\nConnection: close\r\n\r\n"
            .to_vec();
    for chunk in archive.chunks(7_777) {
        response.extend_from_slice(format!("{:x}\r\n", chunk.len()).as_bytes());
        response.extend_from_slice(chunk);
        response.extend_from_slice(b"\r\n");
    }
    response.extend_from_slice(b"0\r\n\r\n");

    let (base_url, server) = serve_once(response);
    let dir = tempdir().unwrap();
    let destination = dir.path().join("results.zip");

    let written = client(&base_url)
        .fetch_results(&JobHandle::from("abc"), &destination)
        .unwrap();
    let request = server.join().unwrap();

    assert!(request.starts_with("GET /download_results/abc HTTP/1.1"));
    assert_eq!(written, archive.len() as u64);
    assert_eq!(fs::read(&destination).unwrap(), archive);
}

#[test]
fn error_status_carries_the_json_detail() {
    let (base_url, server) = serve_once(json_response(
        "400 Bad Request",
        r#"{"detail": "Task not completed yet"}"#,
    ));
    let dir = tempdir().unwrap();
    let destination = dir.path().join("results.zip");

    let err = client(&base_url)
        .fetch_results(&JobHandle::from("abc"), &destination)
        .unwrap_err();
    server.join().unwrap();

    assert_eq!(err.http_status(), Some(400));
    assert!(err.to_string().contains("Task not completed yet"));
    assert!(!destination.exists());
}

#[test]
fn unreachable_service_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let err = client(&base_url)
        .get_status(&JobHandle::from("abc"))
        .unwrap_err();

    assert!(matches!(err, ClientError::Transport(_)));
}
