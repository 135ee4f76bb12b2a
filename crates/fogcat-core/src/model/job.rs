//! Orchestrator jobs and the request that asks for one.

use serde::{Deserialize, Serialize};

use crate::kind::{Catalogued, Descriptor, ResourceKind};

/// A unit of work tracked by the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Job {
    pub job_id: String,
    pub original_sender: String,
    pub kind: String,
    pub body: String,
    pub status: String,
}

impl Catalogued for Job {
    const KIND: ResourceKind = ResourceKind::Job;
}

impl Descriptor for Job {
    fn descriptor_id(&self) -> &str {
        &self.job_id
    }
}

/// Request asking the orchestrator to start a new job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RequestNewJobMessage {
    pub sender: String,
    pub job_kind: String,
    pub body: String,
}

impl Catalogued for RequestNewJobMessage {
    const KIND: ResourceKind = ResourceKind::Job;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_uses_kind_as_wire_name() {
        let job = Job {
            job_id: "j1".to_string(),
            original_sender: "fim-a".to_string(),
            kind: "onboard".to_string(),
            body: "{}".to_string(),
            status: "PENDING".to_string(),
        };
        let text = job.encode().unwrap();
        assert!(text.contains("\"kind\":\"onboard\""));
        assert_eq!(Job::decode(&text).unwrap(), job);
        assert_eq!(job.descriptor_id(), "j1");
    }

    #[test]
    fn request_decodes_from_wire() {
        let text = r#"{"sender":"fim-a","job_kind":"onboard","body":"{\"id\":\"f1\"}"}"#;
        let request = RequestNewJobMessage::decode(text).unwrap();
        assert_eq!(request.sender, "fim-a");
        assert_eq!(request.job_kind, "onboard");
        assert_eq!(request.body, r#"{"id":"f1"}"#);
        assert_eq!(RequestNewJobMessage::KIND, ResourceKind::Job);
    }
}
