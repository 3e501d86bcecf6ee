//! Parallel Processing Pipeline
//!
//! Runs every channel through banks A, B and C side by side and blends the
//! three results with the crossfade weights.
//!
//! ```text
//!             ┌─▶ scratch ─▶ bank A ─▶ × wA ─┐
//!   input ─▶ dry ─▶ scratch ─▶ bank B ─▶ × wB ─┼─▶ output (cleared, then +=)
//!             └─▶ scratch ─▶ bank C ─▶ × wC ─┘
//! ```
//!
//! The dry copy is taken before the output is touched and is read by all
//! three banks, so every bank filters the same unmodified input.
//!
//! # Real-time Safety
//! `configure()` and `teardown()` allocate and log; call them off the audio
//! thread. The `process_*` methods never allocate, lock or log.

use std::sync::Arc;

use tracing::{info, warn};
use xfade_dsp::{compute_weights, BankId, FilterBank, MixWeights};

use crate::config::StreamConfig;
use crate::error::{EngineError, EngineResult};
use crate::params::SharedParams;
use crate::updater::{ChannelBanks, CoefficientUpdater};

/// Everything sized by `configure()`
struct Prepared {
    config: StreamConfig,
    updater: CoefficientUpdater,
    /// Three cascades per channel
    banks: Vec<ChannelBanks>,
    /// Per-channel dry snapshot, `max_block_size` long
    dry: Vec<Vec<f32>>,
    /// Per-channel wet buffer, reused by each bank in turn
    scratch: Vec<Vec<f32>>,
}

impl Prepared {
    fn new(config: StreamConfig) -> Self {
        let channels = config.channels as usize;
        let block = config.max_block_size as usize;

        Self {
            config,
            updater: CoefficientUpdater::new(config.sample_rate as f32),
            banks: (0..channels)
                .map(|_| core::array::from_fn(|_| FilterBank::new()))
                .collect(),
            dry: vec![vec![0.0; block]; channels],
            scratch: vec![vec![0.0; block]; channels],
        }
    }

    fn max_frames(&self) -> usize {
        self.config.max_block_size as usize
    }

    /// Refresh coefficients, then derive this block's weights
    #[inline]
    fn begin_block(&mut self, params: &SharedParams) -> EngineResult<MixWeights> {
        self.updater.refresh(params, &mut self.banks)?;
        Ok(compute_weights(params.crossfade()))
    }

    fn check_frames(&self, frames: usize) -> EngineResult<()> {
        if frames > self.max_frames() {
            return Err(EngineError::BlockTooLarge {
                frames,
                max: self.max_frames(),
            });
        }
        Ok(())
    }
}

/// Filter `dry` through each bank of one channel and hand the weighted
/// result to `accumulate`
///
/// Zero-weight banks still run so their delay lines stay continuous.
#[inline]
fn mix_banks<F>(
    banks: &mut ChannelBanks,
    dry: &[f32],
    scratch: &mut [f32],
    weights: &MixWeights,
    mut accumulate: F,
) where
    F: FnMut(&[f32], f32),
{
    let wet = &mut scratch[..dry.len()];
    for bank in BankId::ALL {
        wet.copy_from_slice(dry);
        banks[bank.index()].process_block(wet);
        accumulate(wet, weights.for_bank(bank));
    }
}

#[inline]
fn add_weighted<'a>(dest: impl Iterator<Item = &'a mut f32>, wet: &[f32], weight: f32) {
    for (out, sample) in dest.zip(wet) {
        *out += weight * sample;
    }
}

/// The crossfading three-bank equalizer
///
/// Lives on the audio thread; parameters arrive through the shared
/// `SharedParams` written by the control thread.
pub struct XFadeProcessor {
    params: Arc<SharedParams>,
    prepared: Option<Prepared>,
    last_weights: MixWeights,
}

impl XFadeProcessor {
    /// Create an unconfigured processor reading from `params`
    pub fn new(params: Arc<SharedParams>) -> Self {
        Self {
            params,
            prepared: None,
            last_weights: MixWeights::CENTER,
        }
    }

    /// Allocate buffers and filter state for a session
    ///
    /// Must be called before processing and again whenever the sample rate,
    /// block size or channel count changes. Always starts from silent
    /// delay lines, even when the configuration is unchanged.
    pub fn configure(&mut self, config: StreamConfig) -> EngineResult<()> {
        if let Err(e) = config.validate() {
            warn!("Rejected stream configuration {:?}: {}", config, e);
            return Err(EngineError::ConfigError(e));
        }

        // Old session goes before the new one is allocated
        self.prepared = None;

        let mut prepared = Prepared::new(config);
        prepared.updater.refresh(&self.params, &mut prepared.banks)?;
        self.last_weights = compute_weights(self.params.crossfade());
        self.prepared = Some(prepared);

        info!(
            "Configured processor: {} Hz, {} frames max, {} channel(s), {:.2}ms block latency",
            config.sample_rate,
            config.max_block_size,
            config.channels,
            config.latency_ms()
        );
        Ok(())
    }

    /// Release all buffers and filter state
    pub fn teardown(&mut self) {
        if self.prepared.take().is_some() {
            info!("Processor torn down");
        }
    }

    pub fn is_configured(&self) -> bool {
        self.prepared.is_some()
    }

    /// Active configuration, if any
    pub fn config(&self) -> Option<StreamConfig> {
        self.prepared.as_ref().map(|p| p.config)
    }

    /// Parameter storage this processor reads
    pub fn params(&self) -> &Arc<SharedParams> {
        &self.params
    }

    /// Weights used for the most recent block
    pub fn last_weights(&self) -> MixWeights {
        self.last_weights
    }

    /// Process separate channel buffers in place, one slice per channel
    ///
    /// Channels beyond the configured count pass through untouched.
    ///
    /// # Errors
    /// `NotConfigured`, `BlockTooLarge`, or `BufferSizeMismatch` when the
    /// slices differ in length. The buffers are untouched on error.
    pub fn process_planar(&mut self, channels: &mut [&mut [f32]]) -> EngineResult<()> {
        let prepared = self.prepared.as_mut().ok_or(EngineError::NotConfigured)?;

        let frames = channels.first().map_or(0, |c| c.len());
        if let Some(bad) = channels.iter().find(|c| c.len() != frames) {
            return Err(EngineError::BufferSizeMismatch {
                expected: frames,
                got: bad.len(),
            });
        }
        prepared.check_frames(frames)?;

        let weights = prepared.begin_block(&self.params)?;
        self.last_weights = weights;

        for (ch, buffer) in channels.iter_mut().enumerate().take(prepared.banks.len()) {
            let dry = &mut prepared.dry[ch][..frames];
            dry.copy_from_slice(&buffer[..]);
            buffer.fill(0.0);

            mix_banks(
                &mut prepared.banks[ch],
                dry,
                &mut prepared.scratch[ch],
                &weights,
                |wet, w| add_weighted(buffer.iter_mut(), wet, w),
            );
        }
        Ok(())
    }

    /// Process with separate input and output buses
    ///
    /// Only the channels present on both buses (and configured) go through
    /// the EQ. Outputs with an input but no configured channel get the dry
    /// input; outputs without an input are cleared.
    ///
    /// # Errors
    /// As `process_planar`; every slice on both buses must have the same length.
    pub fn process_buses(&mut self, inputs: &[&[f32]], outputs: &mut [&mut [f32]]) -> EngineResult<()> {
        let prepared = self.prepared.as_mut().ok_or(EngineError::NotConfigured)?;

        let frames = outputs
            .first()
            .map(|c| c.len())
            .or_else(|| inputs.first().map(|c| c.len()))
            .unwrap_or(0);
        let lengths = inputs.iter().map(|c| c.len()).chain(outputs.iter().map(|c| c.len()));
        for len in lengths {
            if len != frames {
                return Err(EngineError::BufferSizeMismatch {
                    expected: frames,
                    got: len,
                });
            }
        }
        prepared.check_frames(frames)?;

        let weights = prepared.begin_block(&self.params)?;
        self.last_weights = weights;

        let eq_channels = inputs.len().min(outputs.len()).min(prepared.banks.len());

        for (ch, output) in outputs.iter_mut().enumerate() {
            if ch >= eq_channels {
                match inputs.get(ch) {
                    Some(&input) => output.copy_from_slice(input),
                    None => output.fill(0.0),
                }
                continue;
            }

            let dry = &mut prepared.dry[ch][..frames];
            dry.copy_from_slice(inputs[ch]);
            output.fill(0.0);

            mix_banks(
                &mut prepared.banks[ch],
                dry,
                &mut prepared.scratch[ch],
                &weights,
                |wet, w| add_weighted(output.iter_mut(), wet, w),
            );
        }
        Ok(())
    }

    /// Process an interleaved buffer in place
    ///
    /// Buffer format: [L0, R0, L1, R1, ...] for the configured channel count.
    ///
    /// # Errors
    /// `BufferSizeMismatch` if the length is not a whole number of frames.
    pub fn process_interleaved(&mut self, buffer: &mut [f32]) -> EngineResult<()> {
        let prepared = self.prepared.as_mut().ok_or(EngineError::NotConfigured)?;

        let stride = prepared.banks.len();
        let frames = buffer.len() / stride;
        if frames * stride != buffer.len() {
            return Err(EngineError::BufferSizeMismatch {
                expected: frames * stride,
                got: buffer.len(),
            });
        }
        prepared.check_frames(frames)?;

        let weights = prepared.begin_block(&self.params)?;
        self.last_weights = weights;

        for ch in 0..stride {
            let dry = &mut prepared.dry[ch][..frames];
            for (d, s) in dry.iter_mut().zip(buffer.iter().skip(ch).step_by(stride)) {
                *d = *s;
            }
            for s in buffer.iter_mut().skip(ch).step_by(stride) {
                *s = 0.0;
            }

            mix_banks(
                &mut prepared.banks[ch],
                dry,
                &mut prepared.scratch[ch],
                &weights,
                |wet, w| add_weighted(buffer.iter_mut().skip(ch).step_by(stride), wet, w),
            );
        }
        Ok(())
    }
}
