//! Produce animation frames of a vibrating membrane with free edges
//! and print a summary of each one.
//! Writing the frames to images is left to whatever plotting tool is at hand;
//! the color range printed here keeps the scale fixed across frames.

use standing_wave::{PlaybackPlan, Wave2D};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let plan = PlaybackPlan::for_modes(2, 3, 1.0, 2.0, 60);
    println!(
        "N={}, Nt={}, cfl={}, {} frames",
        plan.params.resolution,
        plan.params.steps,
        plan.params.cfl,
        plan.frame_count()
    );

    let snapshots = Wave2D::neumann()
        .solve(&plan.params, plan.store)?
        .into_snapshots()
        .ok_or("expected snapshots from a snapshot run")?;
    let range = snapshots
        .symmetric_range()
        .ok_or("no frames were stored")?;
    println!("color range [{:.4}, {:.4}]", range.start(), range.end());

    for (step, frame) in &snapshots.frames {
        println!(
            "step {step:>4}: min {:>8.4}, max {:>8.4}",
            frame.min(),
            frame.max()
        );
    }
    Ok(())
}
