//! Codecs for the built-in generic wrappers `Maybe` and `Result`.
//!
//! Both lead with a UInt32 discriminant: `Maybe` uses 0 = present,
//! 1 = absent; `Result` uses 0 = ok, 1 = error.

use super::kernel::{Codec, DecodeError, Decoded, UInt32Codec};

/// `Maybe<T>` as `Option<T>`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaybeCodec<C>(pub C);

impl<C> MaybeCodec<C> {
    pub fn new(inner: C) -> Self {
        Self(inner)
    }
}

impl<C: Codec> Codec for MaybeCodec<C> {
    type Value = Option<C::Value>;

    fn encode(&self, value: &Option<C::Value>, out: &mut Vec<u8>) {
        match value {
            Some(inner) => {
                UInt32Codec.encode(&0, out);
                self.0.encode(inner, out);
            }
            None => UInt32Codec.encode(&1, out),
        }
    }

    fn decode(&self, offset: usize, bytes: &[u8]) -> Result<Decoded<Option<C::Value>>, DecodeError> {
        let tag = UInt32Codec.decode(offset, bytes)?;
        match tag.result {
            0 => Ok(self.0.decode(tag.next_offset, bytes)?.map(Some)),
            1 => Ok(Decoded {
                result: None,
                next_offset: tag.next_offset,
            }),
            index => Err(DecodeError::UnknownPattern {
                type_name: "Maybe",
                index,
            }),
        }
    }
}

/// `Result<Ok, Error>` as `Result<O, E>`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResultCodec<O, E> {
    pub ok: O,
    pub error: E,
}

impl<O, E> ResultCodec<O, E> {
    pub fn new(ok: O, error: E) -> Self {
        Self { ok, error }
    }
}

impl<O: Codec, E: Codec> Codec for ResultCodec<O, E> {
    type Value = Result<O::Value, E::Value>;

    fn encode(&self, value: &Result<O::Value, E::Value>, out: &mut Vec<u8>) {
        match value {
            Ok(ok) => {
                UInt32Codec.encode(&0, out);
                self.ok.encode(ok, out);
            }
            Err(error) => {
                UInt32Codec.encode(&1, out);
                self.error.encode(error, out);
            }
        }
    }

    fn decode(
        &self,
        offset: usize,
        bytes: &[u8],
    ) -> Result<Decoded<Result<O::Value, E::Value>>, DecodeError> {
        let tag = UInt32Codec.decode(offset, bytes)?;
        match tag.result {
            0 => Ok(self.ok.decode(tag.next_offset, bytes)?.map(Ok)),
            1 => Ok(self.error.decode(tag.next_offset, bytes)?.map(Err)),
            index => Err(DecodeError::UnknownPattern {
                type_name: "Result",
                index,
            }),
        }
    }
}
