use std::{collections::VecDeque, io::Cursor, sync::Mutex};

use async_trait::async_trait;
use serde_json::Value;
use shared::error::FailureReason;

use crate::transport::{Endpoint, RequestPayload, Transport};

/// In-memory transport that replays canned replies in order and records
/// every request it was handed.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<Value, FailureReason>>>,
    calls: Mutex<Vec<(Endpoint, RequestPayload)>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reply(self, reply: Result<Value, FailureReason>) -> Self {
        self.replies.lock().expect("replies").push_back(reply);
        self
    }

    pub(crate) fn calls(&self) -> Vec<(Endpoint, RequestPayload)> {
        self.calls.lock().expect("calls").clone()
    }

    pub(crate) fn json_bodies(&self) -> Vec<Value> {
        self.calls()
            .into_iter()
            .filter_map(|(_, payload)| match payload {
                RequestPayload::Json(body) => Some(body),
                RequestPayload::Multipart(_) => None,
            })
            .collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, endpoint: Endpoint, payload: RequestPayload) -> Result<Value, FailureReason> {
        self.calls.lock().expect("calls").push((endpoint, payload));
        self.replies
            .lock()
            .expect("replies")
            .pop_front()
            .unwrap_or_else(|| Err(FailureReason::network(endpoint.fallback_message())))
    }
}

pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 40, 40, 255]));
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(image)
        .write_to(&mut out, image::ImageFormat::Png)
        .expect("encode png");
    out.into_inner()
}
