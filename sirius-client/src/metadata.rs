//! Per-call request metadata
//!
//! Every Sirius call carries the caller's bearer token and the group it acts
//! for. Uploads also carry their target mount and destination path, because
//! the request body is a bare stream of chunks.

use sirius_core::{Result, SiriusError};
use std::fmt;
use tonic::metadata::{MetadataMap, MetadataValue};
use tonic::Request;

pub const AUTHORIZATION: &str = "authorization";
pub const ACTIVE_GROUP: &str = "active-group";
pub const MOUNT_ID: &str = "mount-id";
pub const PATH: &str = "path";

/// Ordered metadata attachments for one call
#[derive(Clone, PartialEq, Eq)]
pub struct CallMetadata {
    entries: Vec<(&'static str, String)>,
}

impl CallMetadata {
    /// `authorization` and `active-group`, attached to every call
    pub fn new(token: &str, group_id: &str) -> Self {
        Self {
            entries: vec![
                (AUTHORIZATION, format!("bearer: {}", token)),
                (ACTIVE_GROUP, group_id.to_string()),
            ],
        }
    }

    /// Add the upload target (`mount-id`, `path`)
    pub fn with_upload_target(mut self, mount_id: &str, path: &str) -> Self {
        self.entries.push((MOUNT_ID, mount_id.to_string()));
        self.entries.push((PATH, path.to_string()));
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    /// Insert every entry into `map`
    pub fn apply(&self, map: &mut MetadataMap) -> Result<()> {
        for (key, value) in &self.entries {
            let value = MetadataValue::try_from(value.as_str()).map_err(|e| {
                SiriusError::InvalidMetadata {
                    key: *key,
                    reason: e.to_string(),
                }
            })?;
            map.insert(*key, value);
        }
        Ok(())
    }

    /// Wrap `message` in a request carrying this metadata
    pub fn into_request<T>(self, message: T) -> Result<Request<T>> {
        let mut request = Request::new(message);
        self.apply(request.metadata_mut())?;
        Ok(request)
    }
}

impl fmt::Debug for CallMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (key, value) in &self.entries {
            if *key == AUTHORIZATION {
                map.entry(key, &"<redacted>");
            } else {
                map.entry(key, value);
            }
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_entries() {
        let metadata = CallMetadata::new("T", "g1");
        assert_eq!(metadata.get(AUTHORIZATION), Some("bearer: T"));
        assert_eq!(metadata.get(ACTIVE_GROUP), Some("g1"));
        assert_eq!(metadata.get(MOUNT_ID), None);
        assert_eq!(
            metadata.keys().collect::<Vec<_>>(),
            vec![AUTHORIZATION, ACTIVE_GROUP]
        );
    }

    #[test]
    fn test_upload_entries_order() {
        let metadata = CallMetadata::new("T", "g1").with_upload_target("m1", "uploads/movie.mov");
        assert_eq!(
            metadata.keys().collect::<Vec<_>>(),
            vec![AUTHORIZATION, ACTIVE_GROUP, MOUNT_ID, PATH]
        );
        assert_eq!(metadata.get(PATH), Some("uploads/movie.mov"));
    }

    #[test]
    fn test_into_request_sets_metadata() {
        let request = CallMetadata::new("T", "g1")
            .with_upload_target("m1", "a/b.txt")
            .into_request(())
            .unwrap();
        let map = request.metadata();
        assert_eq!(map.get(AUTHORIZATION).unwrap().to_str().unwrap(), "bearer: T");
        assert_eq!(map.get(ACTIVE_GROUP).unwrap().to_str().unwrap(), "g1");
        assert_eq!(map.get(MOUNT_ID).unwrap().to_str().unwrap(), "m1");
        assert_eq!(map.get(PATH).unwrap().to_str().unwrap(), "a/b.txt");
    }

    #[test]
    fn test_invalid_value_rejected() {
        let err = CallMetadata::new("T", "g1\nx").into_request(()).unwrap_err();
        assert!(matches!(
            err,
            SiriusError::InvalidMetadata { key: ACTIVE_GROUP, .. }
        ));
    }

    #[test]
    fn test_debug_redacts_token() {
        let rendered = format!("{:?}", CallMetadata::new("secret-token", "g1"));
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("g1"));
    }
}
