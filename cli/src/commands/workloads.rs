use colored::*;
use strain_core::WorkloadKind;

pub fn workloads() {
    for kind in WorkloadKind::ALL {
        println!("{:<12} {}", kind.name().bold().green(), kind.description());
    }
}
