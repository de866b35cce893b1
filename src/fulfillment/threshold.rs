use std::cmp::Ordering;

use sha2::{Digest, Sha256};

use crate::codec::{self, CodecError, Reader};
use crate::condition::Condition;
use crate::error::ConditionError;
use crate::fulfillment::{Fulfillment, FEATURE_SHA256, FEATURE_THRESHOLD};
use crate::Result;

/// Subentry flag: the body is a fulfillment rather than a condition.
const FLAG_FULFILLMENT: u8 = 0x80;
/// Subentry flag: an explicit (non-default) weight follows.
const FLAG_WEIGHT: u8 = 0x40;
/// Subentry flag: a non-empty prefix follows.
const FLAG_PREFIX: u8 = 0x20;
/// Low bits are reserved and must be zero.
const RESERVED_FLAGS: u8 = 0x1f;

const DEFAULT_WEIGHT: u32 = 1;

/// A weighted gate satisfied when the weights of validating subentries
/// reach the threshold.
///
/// Subentry insertion order is part of the derived condition. Serializing
/// reveals only the cheapest satisfying subset of witnesses; everything
/// else is demoted to its bare condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Threshold {
    threshold: u32,
    subentries: Vec<Subentry>,
}

/// One slot of a threshold gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subentry {
    /// Contribution towards the threshold when the body validates.
    pub weight: u32,
    /// Bytes prepended to the verification message for this slot only.
    pub prefix: Vec<u8>,
    /// The witness, or the bare commitment when unresolved.
    pub body: SubentryBody,
}

/// Resolved or unresolved body of a subentry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubentryBody {
    /// A resolved sub-fulfillment.
    Fulfillment(Fulfillment),
    /// An unresolved sub-condition.
    Condition(Condition),
}

impl Subentry {
    /// A subentry with the default weight and no prefix.
    pub fn new(body: SubentryBody) -> Self {
        Self {
            weight: DEFAULT_WEIGHT,
            prefix: Vec::new(),
            body,
        }
    }

    /// The condition view of this slot, derived for resolved bodies.
    pub fn condition(&self) -> Result<Condition> {
        match &self.body {
            SubentryBody::Fulfillment(fulfillment) => fulfillment.condition(),
            SubentryBody::Condition(condition) => Ok(condition.clone()),
        }
    }

    fn feature_bitmask(&self) -> u64 {
        match &self.body {
            SubentryBody::Fulfillment(fulfillment) => fulfillment.feature_bitmask(),
            SubentryBody::Condition(condition) => condition.type_bitmask,
        }
    }

    /// Flags + weight + prefix, as counted by the worst-case bound. The
    /// bound always accounts for the weight and prefix fields, defaulted
    /// or not.
    fn bound_overhead(&self) -> u64 {
        1 + codec::varuint_len(u64::from(self.weight)) as u64
            + codec::varuint_len(self.prefix.len() as u64) as u64
            + self.prefix.len() as u64
    }
}

impl Threshold {
    /// Registry type id.
    pub const TYPE_BIT: u64 = 2;
    /// Feature suites this variant needs before counting its subentries.
    pub const FEATURE_BITMASK: u64 = FEATURE_SHA256 | FEATURE_THRESHOLD;

    /// An empty gate requiring `threshold` total weight.
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold,
            subentries: Vec::new(),
        }
    }

    /// The weight this gate requires.
    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// The slots in insertion order.
    pub fn subentries(&self) -> &[Subentry] {
        &self.subentries
    }

    /// Adds a resolved sub-fulfillment with default weight and no prefix.
    pub fn add_fulfillment(&mut self, fulfillment: impl Into<Fulfillment>) -> &mut Self {
        self.add_subentry(Subentry::new(SubentryBody::Fulfillment(fulfillment.into())))
    }

    /// Adds an unresolved sub-condition with default weight and no prefix.
    pub fn add_condition(&mut self, condition: Condition) -> &mut Self {
        self.add_subentry(Subentry::new(SubentryBody::Condition(condition)))
    }

    /// Adds a fully specified slot.
    pub fn add_subentry(&mut self, subentry: Subentry) -> &mut Self {
        self.subentries.push(subentry);
        self
    }

    pub(crate) fn feature_bitmask(&self) -> u64 {
        self.subentries
            .iter()
            .fold(Self::FEATURE_BITMASK, |mask, sub| {
                mask | sub.feature_bitmask()
            })
    }

    /// Commits to the threshold, the slot count, and every slot's weight,
    /// prefix and condition, in insertion order. An empty prefix
    /// contributes no bytes.
    pub(crate) fn fingerprint(&self) -> Result<[u8; 32]> {
        let mut buf = Vec::new();
        codec::write_varuint(&mut buf, Self::TYPE_BIT);
        codec::write_varuint(&mut buf, u64::from(self.threshold));
        codec::write_varuint(&mut buf, self.subentries.len() as u64);
        for sub in &self.subentries {
            codec::write_varuint(&mut buf, u64::from(sub.weight));
            if !sub.prefix.is_empty() {
                codec::write_varbytes(&mut buf, &sub.prefix);
            }
            sub.condition()?.encode(&mut buf);
        }
        Ok(Sha256::digest(&buf).into())
    }

    /// Worst-case payload size over every satisfying subset.
    pub(crate) fn max_fulfillment_length(&self) -> Result<u64> {
        let mut base = (codec::varuint_len(Self::TYPE_BIT)
            + codec::varuint_len(u64::from(self.threshold))
            + codec::varuint_len(self.subentries.len() as u64)) as u64;
        let mut entries = Vec::with_capacity(self.subentries.len());
        for sub in &self.subentries {
            let condition = sub.condition()?;
            let condition_len = condition.encoded_len() as u64;
            let fulfilled_len = match &sub.body {
                SubentryBody::Fulfillment(fulfillment) => {
                    codec::varuint_len(fulfillment.type_bit()) as u64
                        + fulfillment.max_fulfillment_length()?
                }
                // registry type ids all encode in one byte
                SubentryBody::Condition(condition) => 1 + condition.max_fulfillment_length,
            };
            base += sub.bound_overhead() + condition_len;
            entries.push(BoundEntry {
                weight: u64::from(sub.weight),
                growth: fulfilled_len as i64 - condition_len as i64,
            });
        }
        let growth = worst_case_growth(&entries, 0, i64::from(self.threshold)).ok_or(
            ConditionError::UnsatisfiedThreshold {
                threshold: self.threshold,
                weight: entries.iter().map(|e| e.weight).sum(),
            },
        )?;
        Ok((base as i64 + growth) as u64)
    }

    pub(crate) fn encode_payload(&self, out: &mut Vec<u8>) -> Result<()> {
        let fulfilled = self.select()?;
        codec::write_varuint(out, u64::from(self.threshold));
        codec::write_varuint(out, self.subentries.len() as u64);
        for (sub, chosen) in self.subentries.iter().zip(&fulfilled) {
            let body = match (&sub.body, chosen) {
                (SubentryBody::Fulfillment(fulfillment), true) => Some(fulfillment),
                _ => None,
            };
            out.extend(encode_entry(sub, body)?);
        }
        Ok(())
    }

    pub(crate) fn decode_payload(reader: &mut Reader<'_>) -> Result<Self> {
        let threshold = read_u32(reader, "threshold out of range")?;
        let count = reader.read_count().map_err(ConditionError::from)?;
        let mut subentries = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let flags = reader.read_u8().map_err(ConditionError::from)?;
            if flags & RESERVED_FLAGS != 0 {
                return Err(CodecError::Invalid("reserved subentry flag bits set").into());
            }
            let weight = if flags & FLAG_WEIGHT != 0 {
                let weight = read_u32(reader, "weight out of range")?;
                if weight == DEFAULT_WEIGHT {
                    return Err(CodecError::Invalid("redundant default weight").into());
                }
                weight
            } else {
                DEFAULT_WEIGHT
            };
            let prefix = if flags & FLAG_PREFIX != 0 {
                let prefix = reader.read_varbytes().map_err(ConditionError::from)?;
                if prefix.is_empty() {
                    return Err(CodecError::Invalid("redundant empty prefix").into());
                }
                prefix.to_vec()
            } else {
                Vec::new()
            };
            let body = if flags & FLAG_FULFILLMENT != 0 {
                SubentryBody::Fulfillment(Fulfillment::decode(reader)?)
            } else {
                SubentryBody::Condition(
                    Condition::decode(reader).map_err(ConditionError::from)?,
                )
            };
            subentries.push(Subentry {
                weight,
                prefix,
                body,
            });
        }
        Ok(Self {
            threshold,
            subentries,
        })
    }

    /// Sums the weights of validating subentries. Each witness checks
    /// against `prefix || message`; an empty prefix leaves the message
    /// untouched, and a prefix with no message verifies the prefix alone.
    pub(crate) fn validate(&self, message: Option<&[u8]>) -> bool {
        let mut weight = 0u64;
        for sub in &self.subentries {
            let SubentryBody::Fulfillment(fulfillment) = &sub.body else {
                continue;
            };
            let valid = if sub.prefix.is_empty() {
                fulfillment.validate(message)
            } else {
                let mut prefixed = sub.prefix.clone();
                if let Some(message) = message {
                    prefixed.extend_from_slice(message);
                }
                fulfillment.validate(Some(&prefixed))
            };
            if valid {
                weight += u64::from(sub.weight);
            }
        }
        weight >= u64::from(self.threshold)
    }

    pub(crate) fn is_satisfiable(&self) -> bool {
        self.select().is_ok()
    }

    /// Chooses which subentries serialize as fulfillments: the satisfying
    /// subset with the smallest encoding, ties broken by fewer fulfilled
    /// entries and then by the smallest concatenated entry bytes. The
    /// tiebreak is part of the wire contract.
    fn select(&self) -> Result<Vec<bool>> {
        let mut cond_entries = Vec::with_capacity(self.subentries.len());
        let mut fulf_entries: Vec<Option<Vec<u8>>> = Vec::with_capacity(self.subentries.len());
        for sub in &self.subentries {
            cond_entries.push(encode_entry(sub, None)?);
            let fulfilled = match &sub.body {
                SubentryBody::Fulfillment(fulfillment) if fulfillment.is_complete() => {
                    Some(encode_entry(sub, Some(fulfillment))?)
                }
                _ => None,
            };
            fulf_entries.push(fulfilled);
        }

        let candidates: Vec<SearchEntry> = (0..self.subentries.len())
            .filter(|&slot| fulf_entries[slot].is_some())
            .map(|slot| SearchEntry {
                slot,
                weight: u64::from(self.subentries[slot].weight),
                growth: entry_growth(&fulf_entries[slot], &cond_entries[slot]),
            })
            .collect();
        let available: u64 = candidates.iter().map(|c| c.weight).sum();
        if available < u64::from(self.threshold) {
            return Err(ConditionError::UnsatisfiedThreshold {
                threshold: self.threshold,
                weight: available,
            });
        }

        // Suffix sums for pruning: reachable weight and best possible
        // (most negative) remaining growth from each position on.
        let mut suffix_weight = vec![0u64; candidates.len() + 1];
        let mut suffix_growth = vec![0i64; candidates.len() + 1];
        for i in (0..candidates.len()).rev() {
            suffix_weight[i] = suffix_weight[i + 1] + candidates[i].weight;
            suffix_growth[i] = suffix_growth[i + 1] + candidates[i].growth.min(0);
        }

        let mut search = Search {
            candidates: &candidates,
            suffix_weight: &suffix_weight,
            suffix_growth: &suffix_growth,
            cond_entries: &cond_entries,
            fulf_entries: &fulf_entries,
            mask: vec![false; self.subentries.len()],
            best: None,
        };
        search.run(0, i64::from(self.threshold), 0);
        let best = search.best.ok_or(ConditionError::UnsatisfiedThreshold {
            threshold: self.threshold,
            weight: available,
        })?;
        Ok(best.mask)
    }
}

struct BoundEntry {
    weight: u64,
    growth: i64,
}

/// Largest total growth over any subset whose weights reach `need`.
fn worst_case_growth(entries: &[BoundEntry], at: usize, need: i64) -> Option<i64> {
    if need <= 0 {
        // Satisfied; only profitable additions remain worth taking.
        return Some(entries[at..].iter().map(|e| e.growth.max(0)).sum());
    }
    let entry = entries.get(at)?;
    let include = worst_case_growth(entries, at + 1, need - entry.weight as i64)
        .map(|growth| growth + entry.growth);
    let exclude = worst_case_growth(entries, at + 1, need);
    match (include, exclude) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    }
}

fn entry_growth(fulfilled: &Option<Vec<u8>>, condition: &[u8]) -> i64 {
    match fulfilled {
        Some(bytes) => bytes.len() as i64 - condition.len() as i64,
        None => 0,
    }
}

#[derive(Clone, Copy)]
struct SearchEntry {
    slot: usize,
    weight: u64,
    growth: i64,
}

struct Selection {
    growth: i64,
    fulfilled: usize,
    bytes: Vec<u8>,
    mask: Vec<bool>,
}

struct Search<'a> {
    candidates: &'a [SearchEntry],
    suffix_weight: &'a [u64],
    suffix_growth: &'a [i64],
    cond_entries: &'a [Vec<u8>],
    fulf_entries: &'a [Option<Vec<u8>>],
    mask: Vec<bool>,
    best: Option<Selection>,
}

impl Search<'_> {
    fn run(&mut self, at: usize, need: i64, growth: i64) {
        if need > 0 && self.suffix_weight[at] < need as u64 {
            return;
        }
        if let Some(best) = &self.best {
            // Even taking every remaining shrinking entry cannot beat or
            // tie the best found so far.
            if growth + self.suffix_growth[at] > best.growth {
                return;
            }
        }
        if at == self.candidates.len() {
            if need > 0 {
                return;
            }
            self.offer(growth);
            return;
        }
        let SearchEntry { slot, weight, growth: entry_growth } = self.candidates[at];
        self.mask[slot] = true;
        self.run(at + 1, need - weight as i64, growth + entry_growth);
        self.mask[slot] = false;
        self.run(at + 1, need, growth);
    }

    fn offer(&mut self, growth: i64) {
        let fulfilled = self.mask.iter().filter(|chosen| **chosen).count();
        let replace = match &self.best {
            None => true,
            Some(best) => match (growth, fulfilled).cmp(&(best.growth, best.fulfilled)) {
                Ordering::Less => true,
                Ordering::Greater => false,
                Ordering::Equal => self.render() < best.bytes,
            },
        };
        if replace {
            self.best = Some(Selection {
                growth,
                fulfilled,
                bytes: self.render(),
                mask: self.mask.clone(),
            });
        }
    }

    fn render(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for (slot, chosen) in self.mask.iter().enumerate() {
            let entry = match &self.fulf_entries[slot] {
                Some(bytes) if *chosen => bytes,
                _ => &self.cond_entries[slot],
            };
            out.extend_from_slice(entry);
        }
        out
    }
}

/// Encodes one slot, as a fulfillment when `fulfilled` is given and as a
/// bare condition otherwise. Defaulted weight and empty prefix are
/// omitted and signalled through the flags byte.
fn encode_entry(sub: &Subentry, fulfilled: Option<&Fulfillment>) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut flags = 0u8;
    if fulfilled.is_some() {
        flags |= FLAG_FULFILLMENT;
    }
    if sub.weight != DEFAULT_WEIGHT {
        flags |= FLAG_WEIGHT;
    }
    if !sub.prefix.is_empty() {
        flags |= FLAG_PREFIX;
    }
    out.push(flags);
    if flags & FLAG_WEIGHT != 0 {
        codec::write_varuint(&mut out, u64::from(sub.weight));
    }
    if flags & FLAG_PREFIX != 0 {
        codec::write_varbytes(&mut out, &sub.prefix);
    }
    match fulfilled {
        Some(fulfillment) => out.extend(fulfillment.to_binary()?),
        None => sub.condition()?.encode(&mut out),
    }
    Ok(out)
}

fn read_u32(reader: &mut Reader<'_>, context: &'static str) -> Result<u32> {
    let value = reader.read_varuint().map_err(ConditionError::from)?;
    u32::try_from(value).map_err(|_| CodecError::Invalid(context).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fulfillment::{Ed25519, Preimage};
    use ed25519_dalek::SigningKey;

    fn signed_ed25519(message: &[u8]) -> Ed25519 {
        let key = SigningKey::from_bytes(&[0x42; 32]);
        let mut fulfillment = Ed25519::new(key.verifying_key().to_bytes());
        fulfillment.sign(message, &key).unwrap();
        fulfillment
    }

    fn roundtrip(gate: Threshold) -> Threshold {
        let fulfillment = Fulfillment::from(gate);
        let binary = fulfillment.to_binary().unwrap();
        match Fulfillment::from_binary(&binary).unwrap() {
            Fulfillment::Threshold(parsed) => parsed,
            other => panic!("expected a threshold, got {other:?}"),
        }
    }

    #[test]
    fn weighted_validation() {
        let mut gate = Threshold::new(3);
        gate.add_subentry(Subentry {
            weight: 2,
            prefix: Vec::new(),
            body: SubentryBody::Fulfillment(Preimage::new("a").into()),
        });
        gate.add_fulfillment(Preimage::new("b"));
        assert!(gate.validate(None));

        let mut short = Threshold::new(4);
        for sub in gate.subentries() {
            short.add_subentry(sub.clone());
        }
        assert!(!short.validate(None));
    }

    #[test]
    fn threshold_monotonicity() {
        let mut gate = Threshold::new(1);
        gate.add_fulfillment(Preimage::new("a"));
        gate.add_fulfillment(Preimage::new("b"));
        assert!(gate.validate(None));

        // raising the bar can only flip true to false
        for threshold in 2..=4 {
            let mut raised = Threshold::new(threshold);
            for sub in gate.subentries() {
                raised.add_subentry(sub.clone());
            }
            assert_eq!(raised.validate(None), threshold <= 2);
        }

        // adding a validating subentry can only help
        gate.add_fulfillment(Preimage::new("c"));
        assert!(gate.validate(None));
    }

    #[test]
    fn prefix_prepends_to_the_message() {
        let signed = signed_ed25519(b"prefix:body");
        let mut gate = Threshold::new(1);
        gate.add_subentry(Subentry {
            weight: 1,
            prefix: b"prefix:".to_vec(),
            body: SubentryBody::Fulfillment(signed.clone().into()),
        });
        assert!(gate.validate(Some(b"body")));
        assert!(!gate.validate(Some(b"prefix:body")));

        // the whole message in the prefix verifies without a message
        let mut bare = Threshold::new(1);
        bare.add_subentry(Subentry {
            weight: 1,
            prefix: b"prefix:body".to_vec(),
            body: SubentryBody::Fulfillment(signed.into()),
        });
        assert!(bare.validate(None));
    }

    #[test]
    fn prefix_is_committed() {
        let mut plain = Threshold::new(1);
        plain.add_fulfillment(Preimage::new("a"));
        let mut prefixed = Threshold::new(1);
        prefixed.add_subentry(Subentry {
            weight: 1,
            prefix: b"p".to_vec(),
            body: SubentryBody::Fulfillment(Preimage::new("a").into()),
        });
        assert_ne!(
            plain.fingerprint().unwrap(),
            prefixed.fingerprint().unwrap()
        );
    }

    #[test]
    fn insertion_order_is_committed() {
        let mut forward = Threshold::new(1);
        forward
            .add_fulfillment(Preimage::new("a"))
            .add_fulfillment(Preimage::new("b"));
        let mut backward = Threshold::new(1);
        backward
            .add_fulfillment(Preimage::new("b"))
            .add_fulfillment(Preimage::new("a"));
        assert_ne!(
            forward.fingerprint().unwrap(),
            backward.fingerprint().unwrap()
        );
    }

    #[test]
    fn selection_reveals_the_cheapest_witness() {
        let mut gate = Threshold::new(1);
        gate.add_fulfillment(signed_ed25519(b"m"));
        gate.add_fulfillment(Preimage::new("tiny"));

        let parsed = roundtrip(gate);
        assert!(matches!(
            &parsed.subentries()[0].body,
            SubentryBody::Condition(_)
        ));
        assert!(matches!(
            &parsed.subentries()[1].body,
            SubentryBody::Fulfillment(Fulfillment::Preimage(_))
        ));
    }

    #[test]
    fn selection_skips_unsigned_witnesses() {
        let key = SigningKey::from_bytes(&[0x42; 32]);
        let mut gate = Threshold::new(1);
        gate.add_fulfillment(Ed25519::new(key.verifying_key().to_bytes()));
        gate.add_fulfillment(Preimage::new("present"));

        let parsed = roundtrip(gate);
        assert!(matches!(
            &parsed.subentries()[0].body,
            SubentryBody::Condition(_)
        ));
        assert!(matches!(
            &parsed.subentries()[1].body,
            SubentryBody::Fulfillment(_)
        ));
    }

    #[test]
    fn serialization_is_deterministic() {
        let build = || {
            let mut gate = Threshold::new(1);
            gate.add_fulfillment(Preimage::new("twin"));
            gate.add_fulfillment(Preimage::new("twin"));
            Fulfillment::from(gate)
        };
        let first = build().to_binary().unwrap();
        assert_eq!(first, build().to_binary().unwrap());

        // parse -> serialize is a fixed point
        let reparsed = Fulfillment::from_binary(&first).unwrap();
        assert_eq!(reparsed.to_binary().unwrap(), first);
    }

    #[test]
    fn unsatisfiable_gate_has_no_fulfillment() {
        let mut gate = Threshold::new(2);
        gate.add_fulfillment(Preimage::new("only"));
        assert!(matches!(
            Fulfillment::from(gate).to_binary(),
            Err(ConditionError::UnsatisfiedThreshold {
                threshold: 2,
                weight: 1
            })
        ));
    }

    #[test]
    fn unreachable_weight_has_no_condition() {
        let mut gate = Threshold::new(5);
        gate.add_fulfillment(Preimage::new("a"));
        assert!(matches!(
            gate.max_fulfillment_length(),
            Err(ConditionError::UnsatisfiedThreshold { .. })
        ));
    }

    #[test]
    fn nested_gates_validate_recursively() {
        let message = b"nested";
        let mut inner = Threshold::new(1);
        inner.add_fulfillment(signed_ed25519(message));
        inner.add_fulfillment(Ed25519::new([0x07; 32]));

        let mut outer = Threshold::new(2);
        outer.add_fulfillment(Preimage::new("outer"));
        outer.add_fulfillment(inner);
        assert!(outer.validate(Some(message)));
        assert!(!outer.validate(Some(b"different")));
    }

    #[test]
    fn bitmask_aggregates_the_subtree() {
        let mut inner = Threshold::new(1);
        inner.add_fulfillment(signed_ed25519(b"m"));

        let mut outer = Threshold::new(1);
        outer.add_fulfillment(Preimage::new("p"));
        outer.add_fulfillment(inner);
        assert_eq!(outer.feature_bitmask(), 0x03 | 0x09 | 0x20);
    }

    #[test]
    fn rejects_reserved_flags() {
        let mut payload = Vec::new();
        codec::write_varuint(&mut payload, 1);
        codec::write_varuint(&mut payload, 1);
        payload.push(0x01);
        let mut reader = Reader::new(&payload);
        assert!(matches!(
            Threshold::decode_payload(&mut reader),
            Err(ConditionError::MalformedEncoding(CodecError::Invalid(_)))
        ));
    }

    #[test]
    fn rejects_redundant_default_weight() {
        let mut payload = Vec::new();
        codec::write_varuint(&mut payload, 1);
        codec::write_varuint(&mut payload, 1);
        payload.push(FLAG_WEIGHT);
        codec::write_varuint(&mut payload, 1);
        let mut reader = Reader::new(&payload);
        assert!(matches!(
            Threshold::decode_payload(&mut reader),
            Err(ConditionError::MalformedEncoding(CodecError::Invalid(_)))
        ));
    }

    #[test]
    fn payload_fits_the_advertised_bound() {
        let mut gate = Threshold::new(2);
        gate.add_fulfillment(signed_ed25519(b"m"));
        gate.add_subentry(Subentry {
            weight: 3,
            prefix: b"route".to_vec(),
            body: SubentryBody::Fulfillment(Preimage::new("p").into()),
        });
        let fulfillment = Fulfillment::from(gate);
        let bound = fulfillment.condition().unwrap().max_fulfillment_length;
        assert!(fulfillment.serialize_payload().unwrap().len() as u64 <= bound);
    }
}
