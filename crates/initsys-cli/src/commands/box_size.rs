use crate::cli::BoxArgs;
use crate::error::Result;
use initsys::engine::box_sizer;
use initsys::engine::config::BoxConstraints;
use tracing::info;

pub fn run(args: BoxArgs) -> Result<()> {
    let lengths = compute(&args)?;
    info!("Solved box edges {:?} nm", lengths);
    println!("{:.6} {:.6} {:.6}", lengths[0], lengths[1], lengths[2]);
    Ok(())
}

pub fn compute(args: &BoxArgs) -> Result<[f64; 3]> {
    let constraints = BoxConstraints {
        x: args.x,
        y: args.y,
        z: args.z,
    };
    Ok(box_sizer::calculate_edge_lengths(
        args.mass,
        args.density,
        &constraints,
    )?)
}
