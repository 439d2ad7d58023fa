//! Mock devices for exercising the periodic loops on the host.

use roomsense_hw::{
    ClimateReading, ClimateSensor, Error, MotionSensor, Result, StatusLed, TextDisplay,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Motion detector replaying a scripted sequence of levels; the last level
/// repeats once the script runs out. An empty script fails every read.
pub struct MockMotion {
    levels: Vec<bool>,
    cursor: usize,
}

impl MockMotion {
    pub fn new(levels: &[bool]) -> Self {
        Self {
            levels: levels.to_vec(),
            cursor: 0,
        }
    }
}

impl MotionSensor for MockMotion {
    fn motion(&mut self) -> Result<bool> {
        match self.levels.get(self.cursor).or_else(|| self.levels.last()) {
            Some(&level) => {
                self.cursor += 1;
                Ok(level)
            }
            None => Err(Error::GpioNotFound(0)),
        }
    }
}

/// Climate sensor replaying scripted outcomes; exhausted scripts keep failing.
pub struct MockClimate {
    outcomes: VecDeque<Result<ClimateReading>>,
}

impl MockClimate {
    pub fn new() -> Self {
        Self {
            outcomes: VecDeque::new(),
        }
    }

    pub fn ok(mut self, temperature: f64, humidity: f64) -> Self {
        self.outcomes.push_back(Ok(ClimateReading {
            temperature,
            humidity,
        }));
        self
    }

    pub fn fail(mut self) -> Self {
        self.outcomes
            .push_back(Err(Error::InvalidReading("mock failure".to_string())));
        self
    }
}

impl ClimateSensor for MockClimate {
    fn read(&mut self) -> Result<ClimateReading> {
        self.outcomes
            .pop_front()
            .unwrap_or_else(|| Err(Error::InvalidReading("script exhausted".to_string())))
    }
}

/// LED recording every level it was driven to.
#[derive(Clone, Default)]
pub struct MockLed {
    pub states: Arc<Mutex<Vec<bool>>>,
}

impl MockLed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recorded(&self) -> Vec<bool> {
        self.states.lock().unwrap().clone()
    }
}

impl StatusLed for MockLed {
    fn set(&mut self, on: bool) -> Result<()> {
        self.states.lock().unwrap().push(on);
        Ok(())
    }
}

/// Display recording every pair of lines written to it.
#[derive(Clone, Default)]
pub struct MockDisplay {
    pub frames: Arc<Mutex<Vec<(String, String)>>>,
    pub fail: bool,
}

impl MockDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_frame(&self) -> Option<(String, String)> {
        self.frames.lock().unwrap().last().cloned()
    }
}

impl TextDisplay for MockDisplay {
    fn write_lines(&mut self, top: &str, bottom: &str) -> Result<()> {
        if self.fail {
            return Err(Error::I2c("mock display failure".to_string()));
        }
        self.frames
            .lock()
            .unwrap()
            .push((top.to_string(), bottom.to_string()));
        Ok(())
    }
}
