//! Event payload decoding
//!
//! Record payloads are serialized `tensorflow.Event` messages. Only the
//! fields needed for scalar charts are declared here; prost skips everything
//! else on decode.

use prost::Message;

/// Protobuf wire types for the subset of the event schema we consume
pub mod pb {
    /// `tensorflow.Event`
    #[derive(Clone, PartialEq, prost::Message)]
    pub struct Event {
        #[prost(double, optional, tag = "1")]
        pub wall_time: Option<f64>,
        #[prost(int64, tag = "2")]
        pub step: i64,
        #[prost(oneof = "event::What", tags = "3, 4, 5")]
        pub what: Option<event::What>,
    }

    pub mod event {
        #[derive(Clone, PartialEq, prost::Oneof)]
        pub enum What {
            #[prost(string, tag = "3")]
            FileVersion(String),
            #[prost(bytes, tag = "4")]
            GraphDef(Vec<u8>),
            #[prost(message, tag = "5")]
            Summary(super::Summary),
        }
    }

    /// `tensorflow.Summary`
    #[derive(Clone, PartialEq, prost::Message)]
    pub struct Summary {
        #[prost(message, repeated, tag = "1")]
        pub value: Vec<summary::Value>,
    }

    pub mod summary {
        /// `tensorflow.Summary.Value`
        #[derive(Clone, PartialEq, prost::Message)]
        pub struct Value {
            #[prost(string, tag = "1")]
            pub tag: String,
            #[prost(string, tag = "7")]
            pub node_name: String,
            #[prost(oneof = "value::Kind", tags = "2, 3, 4, 5, 6, 8")]
            pub kind: Option<value::Kind>,
        }

        pub mod value {
            /// Which payload a summary value carries
            ///
            /// Non-scalar kinds are kept as raw bytes; they are never inspected.
            #[derive(Clone, PartialEq, prost::Oneof)]
            pub enum Kind {
                #[prost(float, tag = "2")]
                SimpleValue(f32),
                #[prost(bytes, tag = "3")]
                ObsoleteOldStyleHistogram(Vec<u8>),
                #[prost(bytes, tag = "4")]
                Image(Vec<u8>),
                #[prost(bytes, tag = "5")]
                Histo(Vec<u8>),
                #[prost(bytes, tag = "6")]
                Audio(Vec<u8>),
                #[prost(bytes, tag = "8")]
                Tensor(Vec<u8>),
            }
        }
    }
}

/// A single scalar measurement
#[derive(Debug, Clone, PartialEq)]
pub struct Scalar {
    pub tag: String,
    pub value: f32,
}

impl Scalar {
    pub fn new(tag: impl Into<String>, value: f32) -> Self {
        Self {
            tag: tag.into(),
            value,
        }
    }
}

/// Decoded form of one record payload
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Event {
    /// Progress counter; expected to grow but not guaranteed to
    pub step: i64,
    /// Seconds since the Unix epoch
    pub wall_time: Option<f64>,
    /// Plain scalar summaries carried by this event, in payload order
    pub scalars: Vec<Scalar>,
}

impl Event {
    /// Create an event with no scalars
    pub fn new(step: i64, wall_time: Option<f64>) -> Self {
        Self {
            step,
            wall_time,
            scalars: Vec::new(),
        }
    }

    /// Builder-style helper to attach a scalar
    pub fn with_scalar(mut self, tag: impl Into<String>, value: f32) -> Self {
        self.scalars.push(Scalar::new(tag, value));
        self
    }

    /// Decode a record payload
    ///
    /// Summary values of any kind other than a plain scalar are dropped.
    pub fn decode(payload: &[u8]) -> Result<Self, prost::DecodeError> {
        let raw = pb::Event::decode(payload)?;

        let scalars = match raw.what {
            Some(pb::event::What::Summary(summary)) => summary
                .value
                .into_iter()
                .filter_map(|value| match value.kind {
                    Some(pb::summary::value::Kind::SimpleValue(v)) => {
                        Some(Scalar::new(value.tag, v))
                    }
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        };

        Ok(Self {
            step: raw.step,
            wall_time: raw.wall_time,
            scalars,
        })
    }

    /// Encode as a record payload
    pub fn encode_to_vec(&self) -> Vec<u8> {
        let what = if self.scalars.is_empty() {
            None
        } else {
            Some(pb::event::What::Summary(pb::Summary {
                value: self
                    .scalars
                    .iter()
                    .map(|scalar| pb::summary::Value {
                        tag: scalar.tag.clone(),
                        node_name: String::new(),
                        kind: Some(pb::summary::value::Kind::SimpleValue(scalar.value)),
                    })
                    .collect(),
            }))
        };

        pb::Event {
            wall_time: self.wall_time,
            step: self.step,
            what,
        }
        .encode_to_vec()
    }
}
