use super::{Reply, Transport, TransportError, UploadForm};
use std::collections::VecDeque;
use std::io::{self, Read};
use std::sync::Mutex;

/// A request as seen by [`ScriptedTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RecordedRequest {
    pub method: &'static str,
    pub path: String,
    pub fields: Vec<(String, String)>,
    /// `(field, file name, content)` for every uploaded file.
    pub files: Vec<(String, String, Vec<u8>)>,
}

enum Scripted {
    Reply {
        status: u16,
        body: Vec<u8>,
        max_read: usize,
    },
    Broken {
        status: u16,
        body: Vec<u8>,
    },
    Fail(String),
}

/// In-process stand-in for the simulation service.
///
/// Replies are handed out in the order they were scripted, one per request, and every
/// request is recorded for later inspection.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply_json(self, status: u16, body: serde_json::Value) -> Self {
        self.reply_bytes(status, body.to_string().into_bytes(), usize::MAX)
    }

    /// Scripts a raw body that is handed out at most `max_read` bytes per read call.
    pub fn reply_bytes(self, status: u16, body: Vec<u8>, max_read: usize) -> Self {
        self.push(Scripted::Reply {
            status,
            body,
            max_read,
        })
    }

    /// Scripts a body that fails with a connection reset once `body` has been read.
    pub fn reply_broken(self, status: u16, body: Vec<u8>) -> Self {
        self.push(Scripted::Broken { status, body })
    }

    pub fn fail(self, message: &str) -> Self {
        self.push(Scripted::Fail(message.to_string()))
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.path).collect()
    }

    fn push(self, entry: Scripted) -> Self {
        self.script.lock().unwrap().push_back(entry);
        self
    }

    fn answer(&self, request: RecordedRequest) -> Result<Reply, TransportError> {
        self.requests.lock().unwrap().push(request);
        match self.script.lock().unwrap().pop_front() {
            Some(Scripted::Reply {
                status,
                body,
                max_read,
            }) => {
                let len = body.len() as u64;
                Ok(Reply::new(status, Some(len), Trickle::new(body, max_read)))
            }
            Some(Scripted::Broken { status, body }) => {
                let len = body.len() as u64 * 2;
                Ok(Reply::new(status, Some(len), io::Cursor::new(body).chain(Reset)))
            }
            Some(Scripted::Fail(message)) => Err(TransportError::Io(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                message,
            ))),
            None => Err(TransportError::Io(io::Error::other(
                "no scripted reply left for this request",
            ))),
        }
    }
}

impl Transport for ScriptedTransport {
    fn post_form(&self, path: &str, form: UploadForm) -> Result<Reply, TransportError> {
        let mut files = Vec::new();
        for mut upload in form.files {
            let mut content = Vec::new();
            upload.file.read_to_end(&mut content)?;
            files.push((upload.field.to_string(), upload.file_name, content));
        }
        let fields = form
            .fields
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();

        self.answer(RecordedRequest {
            method: "POST",
            path: path.to_string(),
            fields,
            files,
        })
    }

    fn get(&self, path: &str) -> Result<Reply, TransportError> {
        self.answer(RecordedRequest {
            method: "GET",
            path: path.to_string(),
            fields: Vec::new(),
            files: Vec::new(),
        })
    }
}

/// Reader that never returns more than `max_read` bytes per call.
struct Trickle {
    data: Vec<u8>,
    pos: usize,
    max_read: usize,
}

impl Trickle {
    fn new(data: Vec<u8>, max_read: usize) -> Self {
        Self {
            data,
            pos: 0,
            max_read: max_read.max(1),
        }
    }
}

impl Read for Trickle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = &self.data[self.pos..];
        let n = remaining.len().min(buf.len()).min(self.max_read);
        buf[..n].copy_from_slice(&remaining[..n]);
        self.pos += n;
        Ok(n)
    }
}

/// Reader that fails every call, as a dropped connection would.
struct Reset;

impl Read for Reset {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(
            io::ErrorKind::ConnectionReset,
            "connection reset by peer",
        ))
    }
}
