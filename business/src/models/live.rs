//! Live-stream metadata attached to a video.

use serde::{Deserialize, Serialize};

/// Latency/robustness trade-off chosen by the streamer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum LiveLatencyMode {
    Default,
    HighLatency,
    SmallLatency,
}

impl TryFrom<u8> for LiveLatencyMode {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Default),
            2 => Ok(Self::HighLatency),
            3 => Ok(Self::SmallLatency),
            other => Err(format!("unknown live latency mode {other}")),
        }
    }
}

impl From<LiveLatencyMode> for u8 {
    fn from(mode: LiveLatencyMode) -> Self {
        match mode {
            LiveLatencyMode::Default => 1,
            LiveLatencyMode::HighLatency => 2,
            LiveLatencyMode::SmallLatency => 3,
        }
    }
}

/// Live settings of a video. Ingest URLs are only advertised for local
/// lives; lives federated from another instance carry no stream key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveVideo {
    pub rtmp_url: Option<String>,
    pub rtmps_url: Option<String>,
    pub stream_key: Option<String>,
    pub permanent_live: bool,
    pub save_replay: bool,
    pub latency_mode: LiveLatencyMode,
}

impl LiveVideo {
    /// An empty stream key counts as no key.
    pub fn is_local(&self) -> bool {
        self.stream_key.as_deref().is_some_and(|key| !key.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn live(stream_key: Option<&str>) -> LiveVideo {
        LiveVideo {
            rtmp_url: None,
            rtmps_url: None,
            stream_key: stream_key.map(str::to_owned),
            permanent_live: false,
            save_replay: true,
            latency_mode: LiveLatencyMode::SmallLatency,
        }
    }

    #[test]
    fn test_stream_key_marks_local_live() {
        assert!(live(Some("key")).is_local());
        assert!(!live(None).is_local());
    }

    #[test]
    fn test_empty_stream_key_is_remote() {
        assert!(!live(Some("")).is_local());

        let decoded: LiveVideo = serde_json::from_value(serde_json::json!({
            "rtmpUrl": null, "rtmpsUrl": null, "streamKey": "",
            "permanentLive": false, "saveReplay": false, "latencyMode": 1
        }))
        .unwrap();
        assert!(!decoded.is_local());
    }

    #[test]
    fn test_latency_mode_wire_values() {
        let json = serde_json::to_value(live(Some("k"))).unwrap();
        assert_eq!(json["latencyMode"], 3);

        let decoded: Result<LiveVideo, _> = serde_json::from_value(serde_json::json!({
            "rtmpUrl": null, "rtmpsUrl": null, "streamKey": null,
            "permanentLive": true, "saveReplay": false, "latencyMode": 7
        }));
        assert!(decoded.is_err());
    }
}
