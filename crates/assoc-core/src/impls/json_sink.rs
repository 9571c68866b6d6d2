//! JsonSink - JSON Lines 出力
//!
//! 1 呼び出しにつき 1 行:
//! `{"at":"2024-01-02T03:04:05Z","change":"create","payload":"player","body":{...}}`

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use crate::domain::{ChangeKind, Payload};
use crate::ports::{Clock, Sink, SystemClock};

#[derive(Serialize)]
struct Line<'a, T> {
    at: DateTime<Utc>,
    change: ChangeKind,
    payload: &'static str,
    body: &'a T,
}

pub struct JsonSink<W: Write, C: Clock = SystemClock> {
    out: W,
    clock: C,
}

impl<W: Write> JsonSink<W, SystemClock> {
    pub fn new(out: W) -> Self {
        Self::with_clock(out, SystemClock)
    }
}

impl<W: Write, C: Clock> JsonSink<W, C> {
    pub fn with_clock(out: W, clock: C) -> Self {
        Self { out, clock }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line<T: Payload>(&mut self, change: ChangeKind, obj: &T) {
        let line = Line {
            at: self.clock.now(),
            change,
            payload: T::NAME,
            body: obj,
        };
        let result = serde_json::to_writer(&mut self.out, &line)
            .map_err(std::io::Error::from)
            .and_then(|()| self.out.write_all(b"\n"));
        if let Err(e) = result {
            warn!(payload = T::NAME, %change, error = %e, "failed to write transmission");
        }
    }
}

impl<W: Write, C: Clock> Sink for JsonSink<W, C> {
    fn send<T: Payload>(&mut self, obj: &T) {
        self.line(ChangeKind::Send, obj);
    }

    fn send_create<T: Payload>(&mut self, obj: &T) {
        self.line(ChangeKind::Create, obj);
    }

    fn send_update<T: Payload>(&mut self, obj: &T) {
        self.line(ChangeKind::Update, obj);
    }
}
