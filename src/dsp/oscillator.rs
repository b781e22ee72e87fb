/*
Hard-Sync Oscillator Pair
=========================

Two phase accumulators per voice. The master runs at the note frequency and is
never heard; it only acts as a clock. The slave runs `sync_ratio` times faster
and is what we listen to, read out as a bipolar sawtooth.

Every time the master completes a cycle, the slave is forced back to phase 0
no matter where it was. That reset is the "hard sync":

  master  /|  /|  /|        one ramp per note period
         / | / | / |
        /  |/  |/  |

  slave  /|/|/ /|/|/ /|/|/  ratio 2.5: two full ramps, then a half ramp
                            cut short by the master wrap

Because the slave always restarts at the master's period, the perceived pitch
stays locked to the note while the harmonic content follows `sync_ratio`.
Sweeping the ratio gives the classic tearing sync lead.

Phases are kept in f64. At 48 kHz a low note advances by ~1e-4 per sample, and
f32 accumulators drift audibly over long held notes.

Per sample:

  master += freq * dt
  if master >= 1: wrap, slave = 0      <- sync point
  slave += freq * sync_ratio * dt
  if slave >= 1: wrap                  <- free-running wrap between syncs
  out = slave * 2 - 1
*/

/// Master/slave phase pair implementing hard sync.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOscillator {
    master_phase: f64,
    slave_phase: f64,
}

impl SyncOscillator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restart both accumulators at phase 0 (note-on).
    pub fn reset(&mut self) {
        self.master_phase = 0.0;
        self.slave_phase = 0.0;
    }

    /// Advance both phases by one sample.
    ///
    /// Returns `true` when the master wrapped this sample and the slave was
    /// hard-reset.
    #[inline]
    pub fn advance(&mut self, freq: f64, sync_ratio: f64, dt: f64) -> bool {
        self.master_phase += freq * dt;
        let synced = self.master_phase >= 1.0;
        if synced {
            self.master_phase = wrap_phase(self.master_phase);
            self.slave_phase = 0.0;
        } else if self.master_phase < 0.0 {
            // negative frequency: runs backwards, never syncs
            self.master_phase = wrap_phase(self.master_phase);
        }

        self.slave_phase += freq * sync_ratio * dt;
        if !(0.0..1.0).contains(&self.slave_phase) {
            self.slave_phase = wrap_phase(self.slave_phase);
        }

        synced
    }

    /// Current sawtooth output in [-1, 1), read from the slave phase.
    #[inline]
    pub fn saw(&self) -> f32 {
        (self.slave_phase * 2.0 - 1.0) as f32
    }

    /// Advance one sample and return the sawtooth.
    #[inline]
    pub fn next_sample(&mut self, freq: f64, sync_ratio: f64, dt: f64) -> f32 {
        self.advance(freq, sync_ratio, dt);
        self.saw()
    }

    pub fn master_phase(&self) -> f64 {
        self.master_phase
    }

    pub fn slave_phase(&self) -> f64 {
        self.slave_phase
    }
}

/// Fold a phase that left [0, 1) back into range.
///
/// Uses the fractional part rather than a single subtraction so an increment
/// larger than a whole cycle still lands in range.
#[inline]
fn wrap_phase(phase: f64) -> f64 {
    let wrapped = phase.fract();
    if wrapped >= 0.0 {
        return wrapped;
    }
    // tiny negative remainders round up to exactly 1.0
    let lifted = wrapped + 1.0;
    if lifted >= 1.0 {
        0.0
    } else {
        lifted
    }
}
