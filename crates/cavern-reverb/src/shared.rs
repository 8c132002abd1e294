//! Lock-free parameter handoff between a control thread and the audio
//! thread.
//!
//! Hosts change parameters from UI or automation threads while the audio
//! callback is running. Applying them without synchronization is a data
//! race, so the handoff here publishes whole-snapshot updates through a
//! seqlock: nine bit-stored atomic floats guarded by a generation counter.
//! The writer is wait-free (two counter bumps and nine stores); the reader
//! retries only while a write is in flight, which at audio block rates is
//! effectively never. No locks, no allocation, no `unsafe`.
//!
//! The intended pattern is one `SharedParams` in an `Arc` (or a `static`),
//! the control side calling [`store`](SharedParams::store) and the audio
//! side calling [`load`](SharedParams::load) once per block, feeding the
//! result to [`ReverbEngine::set_params`](crate::ReverbEngine::set_params).

use core::sync::atomic::{AtomicU32, Ordering, fence};

use crate::ReverbParams;

const FIELD_COUNT: usize = 9;

/// Seqlock-protected snapshot of [`ReverbParams`].
///
/// Single-writer, any number of readers. Torn reads are impossible: a
/// reader that overlaps a write observes the generation change and retries.
#[derive(Debug)]
pub struct SharedParams {
    generation: AtomicU32,
    fields: [AtomicU32; FIELD_COUNT],
}

impl SharedParams {
    /// Create a handoff slot holding the given initial parameters.
    pub fn new(params: ReverbParams) -> Self {
        let bits = pack(&params);
        Self {
            generation: AtomicU32::new(0),
            fields: core::array::from_fn(|i| AtomicU32::new(bits[i])),
        }
    }

    /// Publish a new snapshot. Call from the control thread only.
    ///
    /// Values are clamped before publication so readers never observe an
    /// out-of-range set.
    pub fn store(&self, params: &ReverbParams) {
        let bits = pack(&params.clamped());
        // Odd generation marks a write in flight.
        let generation = self.generation.load(Ordering::Relaxed);
        self.generation
            .store(generation.wrapping_add(1), Ordering::Release);
        fence(Ordering::Release);
        for (slot, bits) in self.fields.iter().zip(bits) {
            slot.store(bits, Ordering::Relaxed);
        }
        self.generation
            .store(generation.wrapping_add(2), Ordering::Release);
    }

    /// Read a consistent snapshot. Safe to call from the audio thread.
    ///
    /// Retries while a concurrent write is in flight; each retry is a
    /// handful of loads, so the wait is bounded by the writer's nine
    /// stores.
    pub fn load(&self) -> ReverbParams {
        loop {
            let before = self.generation.load(Ordering::Acquire);
            if before & 1 == 1 {
                core::hint::spin_loop();
                continue;
            }
            let bits: [u32; FIELD_COUNT] =
                core::array::from_fn(|i| self.fields[i].load(Ordering::Relaxed));
            fence(Ordering::Acquire);
            let after = self.generation.load(Ordering::Relaxed);
            if before == after {
                return unpack(&bits);
            }
        }
    }
}

impl Default for SharedParams {
    fn default() -> Self {
        Self::new(ReverbParams::default())
    }
}

fn pack(params: &ReverbParams) -> [u32; FIELD_COUNT] {
    [
        params.room_size.to_bits(),
        params.damping.to_bits(),
        params.wet_level.to_bits(),
        params.dry_level.to_bits(),
        params.width.to_bits(),
        params.freeze.to_bits(),
        params.high_freq_delay.to_bits(),
        params.crossover.to_bits(),
        params.detune_amount.to_bits(),
    ]
}

fn unpack(bits: &[u32; FIELD_COUNT]) -> ReverbParams {
    ReverbParams {
        room_size: f32::from_bits(bits[0]),
        damping: f32::from_bits(bits[1]),
        wet_level: f32::from_bits(bits[2]),
        dry_level: f32::from_bits(bits[3]),
        width: f32::from_bits(bits[4]),
        freeze: f32::from_bits(bits[5]),
        high_freq_delay: f32::from_bits(bits[6]),
        crossover: f32::from_bits(bits[7]),
        detune_amount: f32::from_bits(bits[8]),
    }
}
