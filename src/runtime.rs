// 50 Hz sampling loop
// Each tick drains pending joint states, evaluates every leg from the last
// known angles, appends the result to the record log and republishes it.

use std::io::BufRead;
use std::time::Instant;

use tokio::io::AsyncWriteExt;
use tokio::sync::{broadcast, mpsc};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

// local imports
use crate::config::{RuntimeConfig, JOINT_STATE_QUEUE, POSITION_QUEUE};
use crate::kinematics::{JointAngles, Quadruped};
use crate::messages::{JointState, PositionSample, RuntimeHealth};
use crate::sink::RecordSink;

pub type RunResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

pub struct Runtime {
    robot: Quadruped,
    // Last known angles per leg, indexed like robot.legs()
    last_angles: Vec<Option<JointAngles>>,
    started_at: Instant,
    health: RuntimeHealth,
}

impl Runtime {
    pub fn new(robot: Quadruped) -> Self {
        let last_angles = vec![None; robot.len()];
        Self {
            robot,
            last_angles,
            started_at: Instant::now(),
            health: RuntimeHealth::NoJointState, // Until the first joint state
        }
    }

    /// Record the angles of every leg present in the joint state
    pub fn on_joint_state(&mut self, state: &JointState) {
        if let Err(e) = state.validate() {
            warn!("Ignoring joint state: {}", e);
            return;
        }

        for (leg, slot) in self.robot.legs().iter().zip(self.last_angles.iter_mut()) {
            match leg.angles_from(state) {
                Ok(angles) => *slot = Some(angles),
                Err(e) => debug!("No update for {}: {}", leg.name, e),
            }
        }
    }

    /// Evaluate all legs, or None before any leg has been observed
    pub fn compute_sample(&mut self) -> Option<PositionSample> {
        if self.last_angles.iter().all(Option::is_none) {
            self.health = RuntimeHealth::NoJointState;
            return None;
        }

        if self.health != RuntimeHealth::Ok {
            info!("Joint state received, evaluating {} legs", self.robot.len());
        }
        self.health = RuntimeHealth::Ok;

        Some(PositionSample {
            time_stamp: self.started_at.elapsed().as_secs_f64(),
            legs: self.robot.evaluate_known(&self.last_angles),
        })
    }

    pub fn health(&self) -> RuntimeHealth {
        self.health
    }

    pub fn last_angles(&self) -> &[Option<JointAngles>] {
        &self.last_angles
    }
}

/// Run the sampler until the joint-state feed closes or the tick limit is hit
pub async fn run_with(
    config: RuntimeConfig,
    mut joint_rx: mpsc::Receiver<JointState>,
    position_tx: broadcast::Sender<PositionSample>,
) -> RunResult {
    config.validate()?;

    let mut sink = RecordSink::open(&config.log_path).await?;
    let mut runtime = Runtime::new(Quadruped::new(config.legs.clone()));
    let mut tick = interval(config.tick_period());
    tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(
        "Runtime started: {}Hz loop, {} legs",
        config.loop_hz,
        config.legs.len()
    );

    let mut ticks: u64 = 0;
    loop {
        tick.tick().await;

        // 1. Drain all pending joint states (non-blocking)
        let mut feed_closed = false;
        loop {
            match joint_rx.try_recv() {
                Ok(state) => runtime.on_joint_state(&state),
                Err(mpsc::error::TryRecvError::Empty) => break,
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    feed_closed = true;
                    break;
                }
            }
        }

        // 2. Evaluate, log and publish
        if let Some(sample) = runtime.compute_sample() {
            sink.append(&sample).await?;

            if let Some(first) = sample.legs.first() {
                let p = first.position;
                info!(
                    "End-Effector Position: x={:.2}, y={:.2}, z={:.2}",
                    p.x, p.y, p.z
                );
            }

            // No subscribers is not an error
            if position_tx.send(sample).is_err() {
                debug!("No position subscribers");
            }
        }

        ticks += 1;
        if feed_closed {
            info!("Joint state feed closed after {} ticks", ticks);
            break;
        }
        if config.max_ticks.is_some_and(|max| ticks >= max) {
            info!("Tick limit reached ({})", ticks);
            break;
        }
    }

    info!(
        "Runtime stopped, {} records appended to {}",
        sink.records(),
        sink.path().display()
    );
    Ok(())
}

/// Run with joint states read as JSON lines from stdin and samples printed to stdout
pub async fn run(config: RuntimeConfig) -> RunResult {
    let (joint_tx, joint_rx) = mpsc::channel(JOINT_STATE_QUEUE);
    let (position_tx, mut position_rx) = broadcast::channel(POSITION_QUEUE);

    // Joint-state feed, read on a detached thread
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    warn!("Failed to read joint state: {}", e);
                    break;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<JointState>(&line) {
                Ok(state) => {
                    if joint_tx.blocking_send(state).is_err() {
                        break;
                    }
                }
                Err(e) => warn!("Failed to parse joint state: {}", e),
            }
        }
    });

    // Position subscriber
    let printer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        loop {
            match position_rx.recv().await {
                Ok(sample) => {
                    let Ok(mut line) = serde_json::to_vec(&sample) else {
                        continue;
                    };
                    line.push(b'\n');
                    if stdout.write_all(&line).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("Position output lagging, skipped {} samples", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
        if let Err(e) = stdout.flush().await {
            warn!("Failed to flush position output: {}", e);
        }
    });

    let result = run_with(config, joint_rx, position_tx).await;
    // Sender dropped with run_with; let the printer drain
    if let Err(e) = printer.await {
        warn!("Position printer task failed: {}", e);
    }
    result
}
