use serde::{Deserialize, Serialize};

/// A SARIF log: the root object produced by one `interpret` engine call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Log {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub runs: Vec<Run>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Run {
    /// Absent when the engine produced a run but no result list at all,
    /// which is distinct from an empty list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<SarifResult>>,
}

/// One alert.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifResult {
    #[serde(default)]
    pub message: Message,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<SarifLocation>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_locations: Option<Vec<SarifLocation>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifLocation {
    /// Small integer id that message placeholders refer to. Only meaningful
    /// on related locations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_location: Option<PhysicalLocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysicalLocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_location: Option<ArtifactLocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<Region>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactLocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// When set, `uri` is relative to the run's source location prefix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri_base_id: Option<String>,
}

/// A text region. Lines and columns are 1-based; `end_column` is exclusive,
/// per the SARIF specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub start_line: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_column: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_line: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_column: Option<u32>,
}

impl Message {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_a_minimal_log() {
        let raw = r#"{
            "version": "2.1.0",
            "runs": [{
                "results": [{
                    "message": { "text": "unused variable" },
                    "locations": [{
                        "physicalLocation": {
                            "artifactLocation": { "uri": "src/main.c", "uriBaseId": "%SRCROOT%" },
                            "region": { "startLine": 4, "startColumn": 9, "endLine": 4, "endColumn": 12 }
                        }
                    }]
                }]
            }]
        }"#;
        let log: Log = serde_json::from_str(raw).unwrap();
        assert_eq!(log.runs.len(), 1);
        let results = log.runs[0].results.as_ref().unwrap();
        assert_eq!(results[0].message.text.as_deref(), Some("unused variable"));
        let region = results[0].locations.as_ref().unwrap()[0]
            .physical_location
            .as_ref()
            .unwrap()
            .region
            .as_ref()
            .unwrap();
        assert_eq!(region.start_line, 4);
        assert_eq!(region.end_column, Some(12));
    }

    #[test]
    fn run_without_results_stays_none() {
        let log: Log = serde_json::from_str(r#"{ "runs": [{}] }"#).unwrap();
        assert_eq!(log.runs[0].results, None);
    }
}
