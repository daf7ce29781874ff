// Leg sweep: print foot positions while sweeping one joint of each Pupper left leg
//
// Usage: cargo run --example leg_sweep -- [joint]
// Example: cargo run --example leg_sweep -- 3
//
// joint is 1 (hip yaw), 2 (hip pitch/roll) or 3 (knee); defaults to the knee.

use std::f64::consts::FRAC_PI_2;

use pupper_fk_runtime::config::default_legs;
use pupper_fk_runtime::kinematics::JointAngles;

const STEPS: usize = 8;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("info".parse().unwrap()),
        )
        .init();

    let joint: usize = std::env::args()
        .nth(1)
        .map(|arg| arg.parse())
        .transpose()?
        .unwrap_or(3);
    if !(1..=3).contains(&joint) {
        return Err(format!("joint must be 1, 2 or 3, got {}", joint).into());
    }

    println!("Sweeping joint {} from -90° to +90°", joint);
    println!();

    for leg in default_legs() {
        println!("{} ({})", leg.name, leg.joints[joint - 1]);
        for step in 0..=STEPS {
            let angle = -FRAC_PI_2 + step as f64 * (2.0 * FRAC_PI_2 / STEPS as f64);
            let mut angles = [0.0; 3];
            angles[joint - 1] = angle;

            let p = leg.position(&JointAngles::from(angles));
            println!(
                "  {:+7.1}°  x={:+.4}  y={:+.4}  z={:+.4}",
                angle.to_degrees(),
                p.x,
                p.y,
                p.z
            );
        }
        println!();
    }

    Ok(())
}
