#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

/// Correlation details linking a measurement to the request that caused it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_quality: Option<String>,
    /// Estimated bandwidth in kbps.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bandwidth_estimate: Option<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl RequestContext {
    /// Overwrite every field that `other` sets; errors are appended.
    pub fn merge(&mut self, other: RequestContext) {
        let RequestContext {
            request_id,
            video_id,
            video_title,
            network_type,
            final_quality,
            bandwidth_estimate,
            errors,
        } = other;

        if request_id.is_some() {
            self.request_id = request_id;
        }
        if video_id.is_some() {
            self.video_id = video_id;
        }
        if video_title.is_some() {
            self.video_title = video_title;
        }
        if network_type.is_some() {
            self.network_type = network_type;
        }
        if final_quality.is_some() {
            self.final_quality = final_quality;
        }
        if bandwidth_estimate.is_some() {
            self.bandwidth_estimate = bandwidth_estimate;
        }
        self.errors.extend(errors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn merge_keeps_unset_fields() {
        let mut ctx = RequestContext {
            request_id: Some("req-1".into()),
            video_id: Some("v1".into()),
            errors: vec!["timeout".into()],
            ..Default::default()
        };
        ctx.merge(RequestContext {
            video_id: Some("v2".into()),
            bandwidth_estimate: Some(4_000),
            errors: vec!["404".into()],
            ..Default::default()
        });

        assert_eq!(
            ctx,
            RequestContext {
                request_id: Some("req-1".into()),
                video_id: Some("v2".into()),
                bandwidth_estimate: Some(4_000),
                errors: vec!["timeout".into(), "404".into()],
                ..Default::default()
            }
        );
    }
}
