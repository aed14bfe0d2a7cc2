use std::path::Path;

use notewidget_core::InstanceId;

use crate::commands::common::{open_worker, print_report};
use crate::error::CliError;
use crate::host::FileSurfaceHost;

pub fn run_list(data_dir: &Path) -> Result<(), CliError> {
    let host = FileSurfaceHost::new(data_dir);
    let instances = host.load_instances()?;
    if instances.is_empty() {
        println!("No widget instances placed.");
        return Ok(());
    }

    for instance in instances {
        let text = host
            .read_surface(instance)?
            .map_or_else(|| "(not rendered yet)".to_string(), |model| model.text);
        println!("{instance}  {text}");
    }
    Ok(())
}

pub async fn run_add(id: u32, skip_sync: bool, data_dir: &Path) -> Result<(), CliError> {
    let instance = InstanceId::new(id);
    let host = FileSurfaceHost::new(data_dir);
    if !host.add_instance(instance)? {
        println!("Instance {instance} already placed");
        return Ok(());
    }
    println!("Placed instance {instance}");

    if skip_sync {
        return Ok(());
    }
    let (worker, _config) = open_worker(data_dir).await?;
    let report = worker.on_instance_added(instance).await?;
    print_report(&report, false)
}

pub fn run_remove(id: u32, data_dir: &Path) -> Result<(), CliError> {
    let instance = InstanceId::new(id);
    if FileSurfaceHost::new(data_dir).remove_instance(instance)? {
        println!("Removed instance {instance}");
    } else {
        println!("Instance {instance} is not placed");
    }
    Ok(())
}
