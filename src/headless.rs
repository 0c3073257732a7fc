use crate::config::DemoConfig;
use crate::script::{Script, Step};
use anyhow::{Context, Result};
use arplace_core::{AnchorId, ObjectKind, ScreenPoint};
use arplace_placement::{RegistryCounts, SessionController, SessionObserver, TapOutcome};
use arplace_tracking::{SimulatedSession, TrackingError, TrackingSession};
use rand::{rngs::StdRng, RngCore, SeedableRng};
use serde::Serialize;
use std::{cell::RefCell, rc::Rc};
use tracing::{debug, info};

/// One successful placement.
#[derive(Debug, Clone, Serialize)]
pub struct PlacementSummary {
    pub step: usize,
    pub kind: ObjectKind,
    pub position: [f32; 3],
}

/// Outcome of a headless run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub seed: u64,
    pub steps: usize,
    pub placements: Vec<PlacementSummary>,
    pub misses: usize,
    pub resets: usize,
    pub session_runs: usize,
    pub failures: Vec<String>,
    pub interruptions: usize,
    pub resumptions: usize,
    pub final_counts: RegistryCounts,
    pub coaching_active: bool,
}

#[derive(Default)]
struct LifecycleLog {
    failures: Vec<String>,
    interruptions: usize,
    resumptions: usize,
}

/// Forwards session hooks into the run summary.
struct SummaryObserver(Rc<RefCell<LifecycleLog>>);

impl SessionObserver for SummaryObserver {
    fn session_failed(&mut self, error: &TrackingError) {
        self.0.borrow_mut().failures.push(error.to_string());
    }

    fn session_was_interrupted(&mut self) {
        self.0.borrow_mut().interruptions += 1;
    }

    fn session_interruption_ended(&mut self) {
        self.0.borrow_mut().resumptions += 1;
    }
}

pub fn run(config: &DemoConfig, script: &Script, seed_override: Option<u64>) -> Result<RunSummary> {
    let seed = seed_override
        .or(script.seed)
        .or(config.seed)
        .unwrap_or_else(|| rand::thread_rng().next_u64());
    info!(seed, steps = script.steps.len(), "Starting headless run");

    let log = Rc::new(RefCell::new(LifecycleLog::default()));
    let session = SimulatedSession::new(config.camera.to_camera());
    let rng = StdRng::seed_from_u64(seed);
    let mut controller = SessionController::new(session, rng, &config.placement)
        .with_observer(Box::new(SummaryObserver(Rc::clone(&log))));
    controller.start();

    let mut summary = RunSummary {
        seed,
        steps: script.steps.len(),
        ..Default::default()
    };
    let mut detected: Vec<AnchorId> = Vec::new();

    for (index, step) in script.steps.iter().enumerate() {
        debug!(index, ?step, "Applying step");
        apply_step(&mut controller, &mut detected, &mut summary, index, step)
            .with_context(|| format!("step {index} failed"))?;
        controller.process_events()?;
    }

    let log = log.borrow();
    summary.failures = log.failures.clone();
    summary.interruptions = log.interruptions;
    summary.resumptions = log.resumptions;
    summary.session_runs = controller.session().runs().len();
    summary.final_counts = controller.counts();
    summary.coaching_active = controller.coaching().is_active();
    info!(counts = ?summary.final_counts, "Headless run finished");
    Ok(summary)
}

fn apply_step(
    controller: &mut SessionController<SimulatedSession, StdRng>,
    detected: &mut Vec<AnchorId>,
    summary: &mut RunSummary,
    index: usize,
    step: &Step,
) -> Result<()> {
    match step {
        Step::DetectPlane {
            alignment,
            position,
            normal,
            extent,
        } => {
            let transform = Step::plane_transform(*alignment, *position, *normal)?;
            let extent = Step::extent(*extent)?;
            match controller
                .session_mut()
                .detect_plane(*alignment, transform, extent)
            {
                Some(id) => detected.push(id),
                None => debug!(index, "Plane not detected; session not tracking"),
            }
        }
        Step::GrowPlane {
            plane,
            extent,
            center,
        } => {
            let id = *detected
                .get(*plane)
                .with_context(|| format!("no plane #{plane} has been detected"))?;
            let extent = Step::extent(*extent)?;
            if !controller
                .session_mut()
                .grow_plane(id, glam::Vec3::from_array(*center), extent)
            {
                debug!(index, %id, "Plane no longer tracked");
            }
        }
        Step::EstimatedSurface {
            alignment,
            point,
            normal,
        } => {
            let surface = Step::estimated_surface(*alignment, *point, *normal)?;
            controller.session_mut().add_estimated_surface(surface);
        }
        Step::Tap { x, y } => {
            let center = controller.session().camera().screen_center();
            let point = ScreenPoint::new(x.unwrap_or(center.x), y.unwrap_or(center.y));
            match controller.handle_tap(point)? {
                TapOutcome::Miss => summary.misses += 1,
                outcome => {
                    if let (Some(kind), Some(position)) = (outcome.kind(), outcome.position()) {
                        summary.placements.push(PlacementSummary {
                            step: index,
                            kind,
                            position: position.to_array(),
                        });
                    }
                }
            }
        }
        Step::Look {
            yaw_degrees,
            pitch_degrees,
        } => {
            controller
                .session_mut()
                .camera_mut()
                .rotate(yaw_degrees.to_radians(), pitch_degrees.to_radians());
        }
        Step::Reset => {
            controller.reset();
            detected.clear();
            summary.resets += 1;
        }
        Step::Fail { reason } => controller
            .session_mut()
            .fail(TrackingError::SensorFailure(reason.clone())),
        Step::Interrupt => controller.session_mut().interrupt(),
        Step::Resume => controller.session_mut().end_interruption(),
    }
    Ok(())
}
