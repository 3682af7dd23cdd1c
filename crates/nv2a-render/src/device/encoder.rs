//! Push-buffer word encoding.
//!
//! Each method group is a header word `(count << 18) | (subchannel << 13) | method`
//! followed by `count` data words; data word `i` targets register
//! `method + 4 * i`.

use crate::error::{RenderError, Result};

use super::nv097;

const COUNT_SHIFT: u32 = 18;
const SUBCHANNEL_SHIFT: u32 = 13;
const METHOD_MASK: u32 = 0x1FFC;
const SUBCHANNEL_MASK: u32 = 0x7;
const MAX_COUNT: usize = 0x7FF;

#[inline]
pub const fn header(subchannel: u32, method: u32, count: u32) -> u32 {
    (count << COUNT_SHIFT) | ((subchannel & SUBCHANNEL_MASK) << SUBCHANNEL_SHIFT) | (method & METHOD_MASK)
}

/// Builds the words of one begin/end scope.
#[derive(Debug, Default, Clone)]
pub struct PushEncoder {
    words: Vec<u32>,
}

impl PushEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// One method with a single data word.
    pub fn push1(&mut self, method: u32, value: u32) -> &mut Self {
        self.push(method, &[value])
    }

    /// One method group on the 3D subchannel. Long groups are split into
    /// several headers; register addressing stays contiguous.
    pub fn push(&mut self, method: u32, values: &[u32]) -> &mut Self {
        let mut method = method;
        for chunk in values.chunks(MAX_COUNT) {
            self.words.push(header(nv097::SUBCH_3D, method, chunk.len() as u32));
            self.words.extend_from_slice(chunk);
            method += 4 * chunk.len() as u32;
        }
        self
    }

    pub fn push_bool(&mut self, method: u32, value: bool) -> &mut Self {
        self.push1(method, value as u32)
    }

    pub fn push_f32(&mut self, method: u32, values: &[f32]) -> &mut Self {
        let bits: Vec<u32> = values.iter().map(|v| v.to_bits()).collect();
        self.push(method, &bits)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    #[inline]
    pub fn words(&self) -> &[u32] {
        &self.words
    }

    pub fn finish(self) -> Vec<u32> {
        self.words
    }
}

/// One decoded method group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodCall {
    pub subchannel: u32,
    pub method: u32,
    pub args: Vec<u32>,
}

impl MethodCall {
    /// `(register, value)` pairs the group writes.
    pub fn registers(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.args
            .iter()
            .enumerate()
            .map(move |(i, &v)| (self.method + 4 * i as u32, v))
    }

    #[inline]
    pub fn arg(&self, index: usize) -> Option<u32> {
        self.args.get(index).copied()
    }

    pub fn args_f32(&self) -> Vec<f32> {
        self.args.iter().map(|&w| f32::from_bits(w)).collect()
    }
}

/// Parses a scope back into method groups.
pub fn decode_methods(words: &[u32]) -> Result<Vec<MethodCall>> {
    let mut out = Vec::new();
    let mut at = 0;
    while at < words.len() {
        let head = words[at];
        let count = (head >> COUNT_SHIFT) as usize & MAX_COUNT;
        let end = at + 1 + count;
        if end > words.len() {
            return Err(RenderError::MalformedPushBuffer { offset: at });
        }
        out.push(MethodCall {
            subchannel: (head >> SUBCHANNEL_SHIFT) & SUBCHANNEL_MASK,
            method: head & METHOD_MASK,
            args: words[at + 1..end].to_vec(),
        });
        at = end;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_layout() {
        assert_eq!(header(0, nv097::SET_BLEND_ENABLE, 1), (1 << 18) | 0x0304);
        assert_eq!(header(2, 0x100, 3) >> 13 & 0x7, 2);
    }

    #[test]
    fn encode_then_decode_groups() {
        let mut enc = PushEncoder::new();
        enc.push1(nv097::SET_BLEND_ENABLE, 1)
            .push_f32(nv097::SET_VIEWPORT_OFFSET, &[1.0, 2.0, 0.0, 0.0]);
        let calls = decode_methods(enc.words()).unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].args, vec![1]);
        assert_eq!(calls[1].args_f32(), vec![1.0, 2.0, 0.0, 0.0]);
        let regs: Vec<u32> = calls[1].registers().map(|(r, _)| r).collect();
        assert_eq!(regs, vec![0x0A20, 0x0A24, 0x0A28, 0x0A2C]);
    }

    #[test]
    fn long_groups_split_with_contiguous_registers() {
        let mut enc = PushEncoder::new();
        let data = vec![7u32; MAX_COUNT + 5];
        enc.push(0, &data);
        let calls = decode_methods(enc.words()).unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].args.len(), MAX_COUNT);
        assert_eq!(calls[1].method, 4 * MAX_COUNT as u32);
        assert_eq!(calls[1].args.len(), 5);
    }

    #[test]
    fn truncated_scope_is_rejected() {
        let words = [header(0, 0x0304, 2), 1];
        assert_eq!(
            decode_methods(&words),
            Err(RenderError::MalformedPushBuffer { offset: 0 })
        );
    }
}
