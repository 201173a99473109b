use rodio::Source;
use std::f32::consts::PI;
use std::time::Duration;

const SAMPLE_RATE: u32 = 44100;

/// Completion chimes repeat this often until interrupted.
const CHIME_PERIOD_SECS: f32 = 1.2;

/// Fundamental pitch of each of the five selectable tones.
fn tone_frequency(tone: u8) -> f32 {
    match tone {
        1 => 880.0,
        2 => 659.25,
        3 => 523.25,
        4 => 440.0,
        _ => 987.77,
    }
}

/// Synthesized completion chime: a decaying two-partial bell pulse that
/// repeats forever. Used when the bundled tone asset cannot be decoded.
pub struct ToneCue {
    frequency: f32,
    sample_rate: u32,
    num_sample: usize,
}

impl ToneCue {
    pub fn for_tone(tone: u8) -> Self {
        Self {
            frequency: tone_frequency(tone),
            sample_rate: SAMPLE_RATE,
            num_sample: 0,
        }
    }
}

impl Iterator for ToneCue {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        let period_samples = (CHIME_PERIOD_SECS * self.sample_rate as f32) as usize;
        let t = (self.num_sample % period_samples) as f32 / self.sample_rate as f32;
        self.num_sample = self.num_sample.wrapping_add(1);

        let envelope = (-4.0 * t).exp();
        let sample = (2.0 * PI * self.frequency * t).sin()
            + 0.4 * (4.0 * PI * self.frequency * t).sin();

        Some(sample * envelope * 0.15) // Lower amplitude to prevent clipping
    }
}

impl Source for ToneCue {
    fn current_frame_len(&self) -> Option<usize> {
        None // Infinite stream
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        None // Loops until stopped
    }
}

/// Short rising sweep played once when a session starts.
pub struct StartCue {
    sample_rate: u32,
    num_sample: usize,
    total_samples: usize,
}

impl StartCue {
    const DURATION_SECS: f32 = 0.35;
    const LOW_FREQ: f32 = 440.0;
    const HIGH_FREQ: f32 = 880.0;

    pub fn new() -> Self {
        Self {
            sample_rate: SAMPLE_RATE,
            num_sample: 0,
            total_samples: (Self::DURATION_SECS * SAMPLE_RATE as f32) as usize,
        }
    }
}

impl Default for StartCue {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for StartCue {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.num_sample >= self.total_samples {
            return None;
        }
        let t = self.num_sample as f32 / self.sample_rate as f32;
        self.num_sample += 1;

        let fraction = self.num_sample as f32 / self.total_samples as f32;
        let frequency = Self::LOW_FREQ + (Self::HIGH_FREQ - Self::LOW_FREQ) * fraction;
        // Fade out over the tail to avoid a click at the end.
        let envelope = (1.0 - fraction).min(0.25) * 4.0;

        Some((2.0 * PI * frequency * t).sin() * envelope * 0.15)
    }
}

impl Source for StartCue {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(Duration::from_secs_f32(Self::DURATION_SECS))
    }
}
