//! Mock bus link for integration tests.
//!
//! Records every wire operation so tests can assert on the full traffic
//! history without real hardware, and plays back scripted fault queues
//! for sends and reads.

use std::collections::{HashMap, VecDeque};

use growhub::bus::BusLink;
use growhub::error::BusFault;
use growhub::protocol::SENSOR_FRAME_LEN;

// ── Wire operation record ─────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireOp {
    Send { addr: u8, byte: u8 },
    Read { addr: u8 },
    Recover,
}

// ── MockBus ───────────────────────────────────────────────────

pub struct MockBus {
    pub log: Vec<WireOp>,
    send_faults: VecDeque<BusFault>,
    read_faults: VecDeque<BusFault>,
    frames: HashMap<u8, [u8; SENSOR_FRAME_LEN]>,
}

#[allow(dead_code)]
impl MockBus {
    pub fn new() -> Self {
        Self {
            log: Vec::new(),
            send_faults: VecDeque::new(),
            read_faults: VecDeque::new(),
            frames: HashMap::new(),
        }
    }

    /// Queue `n` faults; the next `n` send attempts fail in order.
    pub fn fail_next_sends(&mut self, n: usize, fault: BusFault) {
        for _ in 0..n {
            self.send_faults.push_back(fault);
        }
    }

    /// Queue `n` faults; the next `n` read attempts fail in order.
    pub fn fail_next_reads(&mut self, n: usize, fault: BusFault) {
        for _ in 0..n {
            self.read_faults.push_back(fault);
        }
    }

    /// Set the sensor frame a node answers with (big-endian on the wire).
    pub fn set_frame(&mut self, addr: u8, humidity: u16, temperature: u16, light: u16) {
        let [h_hi, h_lo] = humidity.to_be_bytes();
        let [t_hi, t_lo] = temperature.to_be_bytes();
        let [l_hi, l_lo] = light.to_be_bytes();
        self.frames
            .insert(addr, [h_hi, h_lo, t_hi, t_lo, l_hi, l_lo]);
    }

    /// Every byte sent to `addr`, in wire order (failed attempts included).
    pub fn sent_to(&self, addr: u8) -> Vec<u8> {
        self.log
            .iter()
            .filter_map(|op| match op {
                WireOp::Send { addr: a, byte } if *a == addr => Some(*byte),
                _ => None,
            })
            .collect()
    }

    pub fn send_count(&self) -> usize {
        self.log
            .iter()
            .filter(|op| matches!(op, WireOp::Send { .. }))
            .count()
    }

    pub fn recoveries(&self) -> usize {
        self.log.iter().filter(|op| **op == WireOp::Recover).count()
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
    }
}

impl Default for MockBus {
    fn default() -> Self {
        Self::new()
    }
}

impl BusLink for MockBus {
    fn send_byte(&mut self, addr: u8, byte: u8) -> Result<(), BusFault> {
        self.log.push(WireOp::Send { addr, byte });
        match self.send_faults.pop_front() {
            Some(fault) => Err(fault),
            None => Ok(()),
        }
    }

    fn read_frame(&mut self, addr: u8, frame: &mut [u8; SENSOR_FRAME_LEN]) -> Result<(), BusFault> {
        self.log.push(WireOp::Read { addr });
        if let Some(fault) = self.read_faults.pop_front() {
            return Err(fault);
        }
        *frame = self.frames.get(&addr).copied().unwrap_or_default();
        Ok(())
    }

    fn recover(&mut self) {
        self.log.push(WireOp::Recover);
    }
}
