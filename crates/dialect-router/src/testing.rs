//! Mock adapter for routing tests. Records every deck it is handed and
//! returns canned results without spawning anything.

use std::sync::{Arc, Mutex};

use dialect_backend::SpiceBackend;
use dialect_core::{
    AcGainParams, AcSweepParams, BackendId, GainResult, NoiseParams, NoisePoint, NoiseResult,
    SweepPoint, SweepResult,
};

pub(crate) struct MockBackend {
    id: BackendId,
    pub decks: Arc<Mutex<Vec<String>>>,
}

impl MockBackend {
    pub fn new(id: BackendId) -> Self {
        Self {
            id,
            decks: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn record(&self, netlist: &str) {
        self.decks.lock().unwrap().push(netlist.to_string());
    }
}

impl SpiceBackend for MockBackend {
    fn id(&self) -> BackendId {
        self.id
    }

    fn is_available(&self) -> bool {
        true
    }

    fn run_ac_gain(
        &self,
        netlist: &str,
        _params: &AcGainParams,
    ) -> dialect_backend::Result<GainResult> {
        self.record(netlist);
        Ok(GainResult {
            magnitude_db: 0.0,
            phase_deg: 0.0,
        })
    }

    fn run_ac_sweep(
        &self,
        netlist: &str,
        _params: &AcSweepParams,
    ) -> dialect_backend::Result<SweepResult> {
        self.record(netlist);
        let points = vec![
            SweepPoint {
                freq_hz: 10.0,
                magnitude_db: 0.0,
                phase_deg: 0.0,
            },
            SweepPoint {
                freq_hz: 100.0,
                magnitude_db: -3.0,
                phase_deg: -45.0,
            },
        ];
        Ok(SweepResult::from_points(points)?)
    }

    fn run_noise_sweep(
        &self,
        netlist: &str,
        _params: &NoiseParams,
    ) -> dialect_backend::Result<NoiseResult> {
        self.record(netlist);
        Ok(NoiseResult {
            points: vec![NoisePoint {
                freq_hz: 10.0,
                output_density: 1e-9,
            }],
            total_output_noise: 1e-6,
        })
    }
}
