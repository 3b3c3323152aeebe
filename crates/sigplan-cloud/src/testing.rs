//! In-memory transport replaying scripted replies.

use std::cell::RefCell;
use std::collections::VecDeque;

use crate::error::{CloudError, Result};
use crate::transport::{HttpReply, Transport};

#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub url: String,
    pub bearer: Option<String>,
    pub body: serde_json::Value,
}

pub(crate) struct ScriptedTransport {
    replies: RefCell<VecDeque<HttpReply>>,
    requests: RefCell<Vec<RecordedRequest>>,
    online: bool,
}

impl ScriptedTransport {
    pub fn new(replies: Vec<HttpReply>) -> Self {
        Self {
            replies: RefCell::new(replies.into()),
            requests: RefCell::new(Vec::new()),
            online: true,
        }
    }

    pub fn offline(mut self) -> Self {
        self.online = false;
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.borrow().clone()
    }
}

impl Transport for ScriptedTransport {
    fn post_json(
        &self,
        url: &str,
        bearer: Option<&str>,
        body: &serde_json::Value,
    ) -> Result<HttpReply> {
        self.requests.borrow_mut().push(RecordedRequest {
            url: url.to_string(),
            bearer: bearer.map(str::to_string),
            body: body.clone(),
        });
        self.replies
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| CloudError::Transport(format!("no scripted reply for {url}")))
    }

    fn has_connection(&self) -> bool {
        self.online
    }
}
