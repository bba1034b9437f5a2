//! Convergence study for both boundary conditions
//! using the `(2, 3)` standing wave.
//! The estimated orders should approach 2.

use standing_wave::{Boundary, ConvergenceParams, Dirichlet, Neumann, SolveError, Wave2D};

fn report<B: Boundary>(solver: Wave2D<B>, params: &ConvergenceParams) -> Result<(), SolveError> {
    let study = solver.convergence_rates(params)?;
    println!("{} boundary", B::NAME);
    println!("{:>10} {:>14} {:>8}", "dx", "L2 error", "order");
    for (level, (h, e)) in study.spacings.iter().zip(&study.errors).enumerate() {
        // no rate for the coarsest level
        let order = match level {
            0 => String::from("-"),
            l => format!("{:.4}", study.orders[l - 1]),
        };
        println!("{h:>10.6} {e:>14.6e} {order:>8}");
    }
    println!();
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let params = ConvergenceParams {
        levels: 5,
        mx: 2,
        my: 3,
        ..Default::default()
    };
    report(Wave2D::new(Dirichlet), &params)?;
    report(Wave2D::new(Neumann), &params)?;
    Ok(())
}
