//! Kernels command

use tomo_projector::ProjectionKernel;

pub fn run() {
    println!("Projection Kernels");
    println!("==================\n");

    for kernel in ProjectionKernel::ALL {
        let marker = if kernel == ProjectionKernel::default() {
            " (default)"
        } else {
            ""
        };
        println!("  {:<24} {}{}", kernel.name(), kernel.description(), marker);
    }
}
