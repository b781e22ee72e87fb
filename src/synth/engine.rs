use crate::{
    dsp::{context::RenderCtx, filter::OnePoleFilter},
    synth::{
        message::{MessageReceiver, ScheduledMessage, SynthMessage},
        params::{Param, SynthParams},
        pool::{VoicePool, VoiceSnapshot, POOL_SIZE},
    },
};

/// Polyphonic hard-sync synth: voice pool, output filter and event intake.
///
/// Every tick runs the same four steps:
///
/// 1. apply queued messages stamped at or before the current frame
/// 2. advance every sounding voice once and sum them
/// 3. smooth the sum through the one-pole filter and trim
/// 4. advance the frame counter
///
/// Nothing inside a tick allocates, locks, or logs.
pub struct SyncSynth<R: MessageReceiver, const N: usize = POOL_SIZE> {
    pool: VoicePool<N>,
    filter: OnePoleFilter,
    params: SynthParams,
    rx: R,
    sample_rate: f32,
    frame_counter: u64,
}

impl<R: MessageReceiver> SyncSynth<R> {
    pub fn new(sample_rate: f32, rx: R) -> Self {
        Self::with_params(sample_rate, SynthParams::default(), rx)
    }
}

impl<R: MessageReceiver, const N: usize> SyncSynth<R, N> {
    /// Build an engine with an explicit pool size and initial controls.
    pub fn with_params(sample_rate: f32, params: SynthParams, rx: R) -> Self {
        tracing::debug!(sample_rate, voices = N, ?params, "creating sync synth");

        let mut filter = OnePoleFilter::new();
        filter.set_resonance(params.resonance);

        Self {
            pool: VoicePool::new(),
            filter,
            params,
            rx,
            sample_rate,
            frame_counter: 0,
        }
    }

    /// Produce one sample with the host-supplied sample period `dt`.
    #[inline]
    pub fn tick(&mut self, dt: f32) -> f32 {
        self.drain_messages();

        let ctx = RenderCtx::from_params(dt, &self.params);
        let mix = self.pool.tick(&ctx);
        let out = self.filter.process(mix, &ctx);

        self.frame_counter += 1;
        out
    }

    /// Produce one sample at the configured sample rate.
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        self.tick(1.0 / self.sample_rate)
    }

    /// Fill `out` sample by sample. Messages are drained before every sample,
    /// so a message stamped mid-block lands on its exact frame.
    pub fn render_block(&mut self, out: &mut [f32]) {
        let dt = 1.0 / self.sample_rate;
        for sample in out.iter_mut() {
            *sample = self.tick(dt);
        }
    }

    fn drain_messages(&mut self) {
        while let Some(&ScheduledMessage { frame, .. }) = self.rx.peek() {
            if frame > self.frame_counter {
                break;
            }
            if let Some(msg) = self.rx.pop() {
                self.apply(msg.message);
            }
        }
    }

    fn apply(&mut self, message: SynthMessage) {
        match message {
            SynthMessage::NoteOn { note } => self.note_on(note),
            SynthMessage::NoteOff { note } => self.note_off(note),
            SynthMessage::SetParam { param, value } => self.set_param(param, value),
            SynthMessage::AllNotesOff => self.all_notes_off(),
        }
    }

    /// Start `note` now. Dropped silently if every slot is busy.
    pub fn note_on(&mut self, note: u8) {
        let _ = self.pool.allocate(note, self.frame_counter);
    }

    pub fn note_off(&mut self, note: u8) {
        self.pool.release(note);
    }

    pub fn all_notes_off(&mut self) {
        self.pool.release_all();
    }

    /// Update one control. Values are taken as-is; clamp upstream.
    pub fn set_param(&mut self, param: Param, value: f32) {
        self.params.set(param, value);
        if param == Param::Resonance {
            self.filter.set_resonance(value);
        }
    }

    pub fn set_params(&mut self, params: SynthParams) {
        self.params = params;
        self.filter.set_resonance(params.resonance);
    }

    pub fn params(&self) -> &SynthParams {
        &self.params
    }

    /// Silence every voice and clear the filter. The frame clock keeps running.
    pub fn reset(&mut self) {
        self.pool.silence_all();
        self.filter.reset();
    }

    pub fn pool(&self) -> &VoicePool<N> {
        &self.pool
    }

    pub fn collect_voice_snapshots(&self, out: &mut Vec<VoiceSnapshot>) {
        self.pool.collect_snapshots(out);
    }

    /// Frames rendered so far; the timestamp the next tick is checked against.
    pub fn frame(&self) -> u64 {
        self.frame_counter
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn receiver_mut(&mut self) -> &mut R {
        &mut self.rx
    }
}
