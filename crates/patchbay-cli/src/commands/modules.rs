//! Module type listing command.

use clap::Args;
use patchbay_config::EngineConfig;
use patchbay_registry::ModuleCategory;

#[derive(Args)]
pub struct ModulesArgs {
    /// Only list one category (source, utility, sink)
    #[arg(long, value_name = "CATEGORY")]
    category: Option<String>,
}

pub fn run(config: &EngineConfig, args: ModulesArgs) -> anyhow::Result<()> {
    let registry = config.registry();

    let categories: Vec<ModuleCategory> = match &args.category {
        Some(wanted) => {
            let category = ModuleCategory::ALL
                .into_iter()
                .find(|c| c.name().eq_ignore_ascii_case(wanted))
                .ok_or_else(|| anyhow::anyhow!("Unknown category: {}", wanted))?;
            vec![category]
        }
        None => ModuleCategory::ALL.to_vec(),
    };

    println!("Available Modules");
    println!("=================");

    for category in categories {
        let modules = registry.modules_in_category(category);
        if modules.is_empty() {
            continue;
        }
        println!();
        println!("{} - {}", category.name(), category.description());
        for module in modules {
            println!("  {:12} - {}", module.module_type, module.description);
        }
    }

    if !config.disabled_modules.is_empty() {
        println!();
        println!("Disabled: {}", config.disabled_modules.join(", "));
    }

    println!();
    println!("Use 'patchbay describe <type>' for parameters and ports.");
    Ok(())
}
