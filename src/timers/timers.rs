use super::{Duration, Instant};
use std::collections::HashMap;
use std::io::Write;

#[derive(Debug, Default)]
struct PhaseTimer {
    start: Option<Instant>,
    elapsed: Duration,
    calls: u32,
}

impl PhaseTimer {
    fn start(&mut self) {
        self.start = Some(Instant::now());
    }

    fn stop(&mut self) {
        if let Some(instant) = self.start.take() {
            self.elapsed += instant.elapsed();
            self.calls += 1;
        }
    }
}

/// Accumulated wall clock time per named engine phase
#[derive(Default, Debug)]
pub(crate) struct Timers {
    stack: Vec<&'static str>,
    phases: HashMap<&'static str, PhaseTimer>,
}

impl Timers {
    pub fn reset(&mut self) {
        self.stack.clear();
        self.phases.clear();
    }

    pub fn start_as_current(&mut self, key: &'static str) {
        self.phases.entry(key).or_default().start();
        self.stack.push(key);
    }

    pub fn stop_current(&mut self) {
        // there is always an active timer when this is reached
        if let Some(key) = self.stack.pop() {
            if let Some(t) = self.phases.get_mut(key) {
                t.stop();
            }
        }
    }

    pub fn print(&self, out: &mut dyn Write) -> std::io::Result<()> {
        let mut keys: Vec<_> = self.phases.keys().collect();
        keys.sort();
        for key in keys {
            let t = &self.phases[key];
            writeln!(out, "  {:<14} : {:?} ({} calls)", key, t.elapsed, t.calls)?;
        }
        Ok(())
    }
}

macro_rules! timeit {
    ($timer:expr => $key:literal; $($tt:tt)+) => {
        $timer.start_as_current($key);
        $(
            $tt
        )+
        $timer.stop_current();
    }
}
pub(crate) use timeit;

#[test]
fn test_timers() {
    let mut timers = Timers::default();

    timeit! {timers => "solve"; {
        timeit! {timers => "factor"; {
            std::thread::sleep(Duration::from_millis(2));
        }}
    }}
    assert!(timers.stack.is_empty());
    assert!(timers.phases["factor"].elapsed > Duration::ZERO);
    assert!(timers.phases["solve"].elapsed >= timers.phases["factor"].elapsed);

    let mut buf = Vec::new();
    timers.print(&mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();
    assert!(text.contains("factor"));
    assert!(text.contains("(1 calls)"));

    timers.reset();
    assert!(timers.phases.is_empty());
}
