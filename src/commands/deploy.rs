//! # Deploy Command Implementation
//!
//! This module implements the `deploy` subcommand, which composes the Heat
//! environment for the undercloud and submits it.
//!
//! ## Functionality
//!
//! - **Working Copy**: The template tree is copied into a private temporary
//!   directory; the installed templates are never modified.
//! - **Composition**: Base, feature and operator environment files are
//!   assembled in order, with operator files from the template tree
//!   redirected into the working copy.
//! - **Passwords**: Secrets are merged and stored in the output directory.
//! - **Dry Run**: `--dry-run` prints the stack request instead of submitting.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use serde::Serialize;

use undercloud::defaults::{
    default_output_dir, DEFAULT_STACK_NAME, DEFAULT_STACK_TEMPLATE, DEFAULT_TEMPLATE_ROOT,
};
use undercloud::environments::{
    BuildFlags, DeploymentParameters, EnvironmentFileList, EnvironmentListBuilder, Feature,
};
use undercloud::orchestration::{HeatCliClient, OrchestrationClient, StackRequest};
use undercloud::output::{OutputConfig, Status};
use undercloud::passwords::RandomPasswordGenerator;
use undercloud::path::absolutize;
use undercloud::process::SystemRunner;
use undercloud::redirect::TemplateRedirector;
use undercloud::workdir::WorkingTree;

/// Output format for `--dry-run`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Compose the environment and create or update the undercloud stack
#[derive(Args, Debug)]
pub struct DeployArgs {
    /// Directory of the canonical template tree.
    #[arg(
        long,
        value_name = "DIR",
        env = "UNDERCLOUD_TEMPLATES",
        default_value = DEFAULT_TEMPLATE_ROOT
    )]
    pub templates: PathBuf,

    /// Environment file to add after the base and feature files (repeatable).
    #[arg(short = 'e', long = "environment-file", value_name = "FILE")]
    pub environment_files: Vec<String>,

    /// Environment file listing container images, added ahead of the
    /// --environment-file files.
    #[arg(long, value_name = "FILE")]
    pub container_images_file: Option<PathBuf>,

    /// Optional feature to enable (repeatable).
    #[arg(long = "feature", value_enum, value_name = "FEATURE")]
    pub features: Vec<Feature>,

    /// Directory for password files.
    ///
    /// Defaults to the home directory.
    #[arg(long, value_name = "DIR", env = "UNDERCLOUD_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Name of the stack to create or update.
    #[arg(long, value_name = "NAME", default_value = DEFAULT_STACK_NAME)]
    pub stack: String,

    /// Control plane address in CIDR notation, e.g. 192.168.24.1/24.
    #[arg(long, value_name = "CIDR")]
    pub local_ip: Option<String>,

    /// Domain name of the undercloud.
    #[arg(long, value_name = "DOMAIN")]
    pub local_domain: Option<String>,

    /// Public virtual IP.
    #[arg(long, value_name = "IP")]
    pub public_virtual_ip: Option<String>,

    /// Control plane virtual IP.
    #[arg(long, value_name = "IP")]
    pub control_virtual_ip: Option<String>,

    /// Leave out the deployed-server noop control plane environment.
    #[arg(long)]
    pub no_deployed_server_noop: bool,

    /// Keep the working copy of the templates after the run.
    #[arg(long)]
    pub keep_working_dir: bool,

    /// Print the stack request instead of submitting it.
    #[arg(long)]
    pub dry_run: bool,

    /// Output format for --dry-run.
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Serialize)]
struct DeployPlan<'a> {
    stack_name: &'a str,
    template: &'a Path,
    environment_files: &'a EnvironmentFileList,
}

/// Execute the `deploy` command.
pub fn execute(mut args: DeployArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    args.templates = absolutize(&args.templates, &std::env::current_dir()?);
    let output_dir = args.output_dir.clone().unwrap_or_else(default_output_dir);

    let tree = WorkingTree::provision(&args.templates).with_context(|| {
        format!(
            "Failed to prepare a working copy of {}",
            args.templates.display()
        )
    })?;
    let outcome = compose_and_submit(&args, &tree, &output_dir, &out);

    if args.keep_working_dir {
        let kept = tree.keep();
        println!(
            "{} Working copy kept at {}",
            out.marker(Status::Info),
            kept.display()
        );
    }
    outcome
}

fn compose_and_submit(
    args: &DeployArgs,
    tree: &WorkingTree,
    output_dir: &Path,
    out: &OutputConfig,
) -> Result<()> {
    let list = compose(args, tree, output_dir)?;
    let template = tree.root().join(DEFAULT_STACK_TEMPLATE);
    let request = StackRequest {
        stack_name: &args.stack,
        template: &template,
        environment_files: &list,
    };

    if args.dry_run {
        print_plan(&request, args.format, out)?;
    } else {
        HeatCliClient::new(SystemRunner)
            .submit(&request)
            .with_context(|| format!("Deployment of stack {} failed", args.stack))?;
        println!("{} Stack {} deployed", out.marker(Status::Ok), args.stack);
    }
    Ok(())
}

/// Build the environment file list against a provisioned working copy.
fn compose(args: &DeployArgs, tree: &WorkingTree, output_dir: &Path) -> Result<EnvironmentFileList> {
    let redirector = TemplateRedirector::new(&args.templates, tree.root());
    let parameters = DeploymentParameters {
        local_ip: args.local_ip.clone(),
        local_domain: args.local_domain.clone(),
        public_virtual_ip: args.public_virtual_ip.clone(),
        control_virtual_ip: args.control_virtual_ip.clone(),
    };
    let parameters_file = parameters.write(tree.dir())?;

    let generator = RandomPasswordGenerator::default();
    let builder = EnvironmentListBuilder::new(&redirector, output_dir, &generator)?
        .with_parameters_file(parameters_file)
        .with_container_images_file(args.container_images_file.clone());
    let flags = BuildFlags {
        features: args.features.iter().copied().collect(),
        deployed_server_noop: !args.no_deployed_server_noop,
    };
    Ok(builder.build(&args.environment_files, &flags)?)
}

fn print_plan(request: &StackRequest<'_>, format: OutputFormat, out: &OutputConfig) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let plan = DeployPlan {
                stack_name: request.stack_name,
                template: request.template,
                environment_files: request.environment_files,
            };
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        OutputFormat::Text => {
            println!(
                "{} Stack {} from {}",
                out.marker(Status::DryRun),
                request.stack_name,
                request.template.display()
            );
            for path in request.environment_files.paths() {
                println!("  -e {}", path.display());
            }
        }
    }
    Ok(())
}
