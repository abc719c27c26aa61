//! Earned certificates, at most one per course

use super::{ActionName, Slice, SliceName};
use crate::types::{Certificate, Id};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CertificatesState {
    pub certificates: Vec<Certificate>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CertificatesAction {
    /// Insert-if-absent keyed on the course, not the certificate id
    Add(Certificate),
    /// Remove by certificate id
    Remove(String),
    Clear,
}

impl ActionName for CertificatesAction {
    fn name(&self) -> String {
        match self {
            Self::Add(_) => "addCertificate",
            Self::Remove(_) => "removeCertificate",
            Self::Clear => "clearCertificates",
        }
        .to_string()
    }
}

impl Slice for CertificatesState {
    type Action = CertificatesAction;
    const NAME: SliceName = SliceName::Certificates;

    fn reduce(&mut self, action: CertificatesAction, _now: DateTime<Utc>) {
        match action {
            CertificatesAction::Add(certificate) => {
                if self.for_course(certificate.course_id).is_none() {
                    self.certificates.push(certificate);
                }
            }
            CertificatesAction::Remove(id) => self.certificates.retain(|c| c.id != id),
            CertificatesAction::Clear => self.certificates.clear(),
        }
    }
}

impl CertificatesState {
    pub fn all(&self) -> &[Certificate] {
        &self.certificates
    }

    pub fn count(&self) -> usize {
        self.certificates.len()
    }

    pub fn for_course(&self, course_id: Id) -> Option<&Certificate> {
        self.certificates.iter().find(|c| c.course_id == course_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cert(id: &str, course_id: Id) -> Certificate {
        Certificate {
            id: id.into(),
            course_id,
            course_name: "Rust".into(),
            earned_at: Utc::now(),
            download_url: None,
        }
    }

    #[test]
    fn test_one_certificate_per_course() {
        let now = Utc::now();
        let mut state = CertificatesState::default();
        state.reduce(CertificatesAction::Add(cert("a", 1)), now);
        state.reduce(CertificatesAction::Add(cert("b", 1)), now);
        state.reduce(CertificatesAction::Add(cert("c", 2)), now);

        assert_eq!(state.count(), 2);
        assert_eq!(state.for_course(1).unwrap().id, "a");
    }

    #[test]
    fn test_remove_and_clear() {
        let now = Utc::now();
        let mut state = CertificatesState::default();
        state.reduce(CertificatesAction::Add(cert("a", 1)), now);
        state.reduce(CertificatesAction::Add(cert("c", 2)), now);

        state.reduce(CertificatesAction::Remove("a".into()), now);
        assert!(state.for_course(1).is_none());

        state.reduce(CertificatesAction::Clear, now);
        assert_eq!(state.count(), 0);
    }
}
