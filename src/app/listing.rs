use crate::registry::Registry;

pub(crate) fn list_exchanges(registry: &Registry) {
    if registry.is_empty() {
        println!("No exchanges configured.");
        return;
    }

    println!();
    println!("Available exchanges:");
    for profile in registry.exchanges() {
        println!(
            "  - {} ({}): {}",
            profile.name, profile.key, profile.description
        );
        println!("    Endpoints:");
        for (key, descriptor) in &profile.endpoints {
            println!("      - {} [{}]: {}", key, descriptor.method, descriptor.url);
        }
    }
    println!();
    println!("Total: {} exchanges", registry.len());
}
