//! Signature and pattern based threat detection.
//!
//! Detection is limited to exact digest matches against a finite blocklist, then a
//! case-sensitive substring search for a single trigger pattern. The first rule that matches
//! decides the reason.

use scanvault_core::digest::is_sha256_hex;
use scanvault_core::models::DetectionReason;
use scanvault_core::{AppError, Config};
use std::collections::HashSet;
use std::sync::Arc;

/// Immutable detection rules, built once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blocklist {
    hashes: HashSet<String>,
    pattern: Vec<u8>,
}

impl Blocklist {
    /// Build a blocklist. Digests are normalized to lowercase; the pattern must be non-empty.
    pub fn new<I, S>(hashes: I, pattern: impl Into<Vec<u8>>) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let pattern = pattern.into();
        if pattern.is_empty() {
            return Err(AppError::InvalidInput(
                "Trigger pattern must not be empty".to_string(),
            ));
        }

        let mut normalized = HashSet::new();
        for hash in hashes {
            let hash = hash.as_ref().trim().to_lowercase();
            if !is_sha256_hex(&hash) {
                return Err(AppError::InvalidInput(format!(
                    "Blocklist entry is not a SHA-256 hex digest: {}",
                    hash
                )));
            }
            normalized.insert(hash);
        }

        Ok(Self {
            hashes: normalized,
            pattern,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        Self::new(
            config.blocklist_hashes(),
            config.trigger_pattern().as_bytes().to_vec(),
        )
    }

    pub fn contains_digest(&self, digest: &str) -> bool {
        self.hashes.contains(digest)
    }

    pub fn pattern(&self) -> &[u8] {
        &self.pattern
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }
}

/// Classification of one piece of content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detection {
    Clean,
    Malicious(DetectionReason),
}

/// Classifies content against a shared [`Blocklist`]. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ThreatDetector {
    blocklist: Arc<Blocklist>,
}

impl ThreatDetector {
    pub fn new(blocklist: Blocklist) -> Self {
        Self {
            blocklist: Arc::new(blocklist),
        }
    }

    pub fn blocklist(&self) -> &Blocklist {
        &self.blocklist
    }

    /// Classify `content` whose SHA-256 hex digest is `digest`.
    ///
    /// Hash match is checked before pattern match.
    pub fn classify(&self, digest: &str, content: &[u8]) -> Detection {
        if self.blocklist.contains_digest(digest) {
            return Detection::Malicious(DetectionReason::HashMatch);
        }

        let pattern = self.blocklist.pattern();
        if content.len() >= pattern.len() && content.windows(pattern.len()).any(|w| w == pattern) {
            return Detection::Malicious(DetectionReason::PatternMatch);
        }

        Detection::Clean
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scanvault_core::sha256_hex;

    fn detector_with(hashes: &[String], pattern: &str) -> ThreatDetector {
        ThreatDetector::new(Blocklist::new(hashes, pattern.as_bytes().to_vec()).unwrap())
    }

    fn default_detector() -> ThreatDetector {
        ThreatDetector::new(
            Blocklist::from_config(&Config(Box::new(scanvault_core::ScanConfig::default())))
                .unwrap(),
        )
    }

    #[test]
    fn hello_world_is_clean() {
        let content = b"hello world";
        let detection = default_detector().classify(&sha256_hex(content), content);
        assert_eq!(detection, Detection::Clean);
    }

    #[test]
    fn trigger_pattern_is_malicious() {
        let content = b"please run DEMO_TRIGGER now";
        let detection = default_detector().classify(&sha256_hex(content), content);
        assert_eq!(detection, Detection::Malicious(DetectionReason::PatternMatch));
    }

    #[test]
    fn pattern_match_is_case_sensitive() {
        let content = b"please run demo_trigger now";
        let detection = default_detector().classify(&sha256_hex(content), content);
        assert_eq!(detection, Detection::Clean);
    }

    #[test]
    fn pattern_at_boundaries() {
        let detector = default_detector();
        for content in [&b"DEMO_TRIGGER"[..], b"DEMO_TRIGGER tail", b"head DEMO_TRIGGER"] {
            assert_eq!(
                detector.classify(&sha256_hex(content), content),
                Detection::Malicious(DetectionReason::PatternMatch)
            );
        }
        assert_eq!(
            detector.classify(&sha256_hex(b"DEMO_TRIGGE"), b"DEMO_TRIGGE"),
            Detection::Clean
        );
    }

    #[test]
    fn empty_content_hits_default_blocklist() {
        let detection = default_detector().classify(&sha256_hex(b""), b"");
        assert_eq!(detection, Detection::Malicious(DetectionReason::HashMatch));
    }

    #[test]
    fn hash_match_wins_over_pattern_match() {
        let content = b"xx DEMO_TRIGGER xx";
        let digest = sha256_hex(content);
        let detector = detector_with(&[digest.clone()], "DEMO_TRIGGER");

        assert_eq!(
            detector.classify(&digest, content),
            Detection::Malicious(DetectionReason::HashMatch)
        );
    }

    #[test]
    fn blocklist_normalizes_case() {
        let digest = sha256_hex(b"abc");
        let detector = detector_with(&[digest.to_uppercase()], "NEVER");
        assert_eq!(
            detector.classify(&digest, b"abc"),
            Detection::Malicious(DetectionReason::HashMatch)
        );
    }

    #[test]
    fn rejects_empty_pattern_and_bad_digest() {
        assert!(Blocklist::new(Vec::<String>::new(), Vec::<u8>::new()).is_err());
        assert!(Blocklist::new(["nope"], b"X".to_vec()).is_err());
    }

    #[test]
    fn classification_is_deterministic() {
        let detector = default_detector();
        let content = b"some bytes \x00\xff";
        let digest = sha256_hex(content);
        assert_eq!(
            detector.classify(&digest, content),
            detector.classify(&digest, content)
        );
    }
}
