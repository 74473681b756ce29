//! ureq-backed `Transport` implementation.
//!
//! # Design
//! The agent is configured with `http_status_as_error(false)` so 4xx/5xx
//! responses come back as data rather than `Err`; only I/O-level failures
//! become `TransportError`. Headers from the request are applied verbatim,
//! so the builder layer stays the single place that decides what a request
//! carries.

use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};

/// Executes requests over real HTTP with a shared ureq agent.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let result = match (&request.method, &request.body) {
            (HttpMethod::Get, _) => {
                let mut call = self.agent.get(&request.path);
                for (name, value) in &request.headers {
                    call = call.header(name.as_str(), value.as_str());
                }
                call.call()
            }
            (HttpMethod::Delete, _) => {
                let mut call = self.agent.delete(&request.path);
                for (name, value) in &request.headers {
                    call = call.header(name.as_str(), value.as_str());
                }
                call.call()
            }
            (HttpMethod::Post, body) => {
                let mut call = self.agent.post(&request.path);
                for (name, value) in &request.headers {
                    call = call.header(name.as_str(), value.as_str());
                }
                match body {
                    Some(body) => call.send(body.as_bytes()),
                    None => call.send_empty(),
                }
            }
            (HttpMethod::Put, body) => {
                let mut call = self.agent.put(&request.path);
                for (name, value) in &request.headers {
                    call = call.header(name.as_str(), value.as_str());
                }
                match body {
                    Some(body) => call.send(body.as_bytes()),
                    None => call.send_empty(),
                }
            }
        };

        let mut response = result.map_err(|e| TransportError(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| TransportError(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body,
        })
    }
}

#[cfg(test)]
pub(crate) use scripted::ScriptedTransport;
