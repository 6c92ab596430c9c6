//! # Matrix Initialization Module / 矩阵初始化模块
//!
//! This module creates a new `EnvMatrix.toml` configuration through an
//! interactive command-line wizard, starting from templates for the common
//! "install a package into a fresh virtualenv and import it" shapes.
//!
//! 此模块通过交互式命令行向导创建新的 `EnvMatrix.toml` 配置，
//! 从常见的「在全新虚拟环境中安装包并导入它」模板出发。

use anyhow::{Context, Result};
use colored::*;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, MultiSelect};
use std::fs;
use std::path::Path;

use crate::core::config::{CaseSpec, EnvMatrix};
use crate::infra::t;

/// Runs the interactive wizard to generate an `EnvMatrix.toml` file.
///
/// 运行交互式向导以生成 `EnvMatrix.toml` 文件。
pub fn run_init_wizard(language: &str, non_interactive: bool) -> Result<()> {
    let config_path = Path::new("EnvMatrix.toml");
    let theme = ColorfulTheme::default();

    if !non_interactive {
        println!("\n{}", t!("init.welcome", locale = language).cyan().bold());
        println!("{}", t!("init.description", locale = language));
    }

    if config_path.exists() && !non_interactive {
        let confirmation = Confirm::with_theme(&theme)
            .with_prompt(
                t!(
                    "init.overwrite_prompt",
                    locale = language,
                    path = config_path.display()
                )
                .to_string(),
            )
            .default(false)
            .interact()
            .context(t!("init.confirm_failed", locale = language).to_string())?;
        if !confirmation {
            println!("{}", t!("init.aborted", locale = language));
            return Ok(());
        }
    }

    let default_matrix = generate_default_matrix(language);

    if non_interactive {
        write_config(config_path, &default_matrix, language)?;
        return Ok(());
    }

    // Interactive part starts here
    let options = vec![
        ("python_venv", t!("init.template_python_venv", locale = language)),
        ("pinned_dep", t!("init.template_pinned_dep", locale = language)),
        ("custom", t!("init.template_custom", locale = language)),
    ];

    let selections = MultiSelect::with_theme(&theme)
        .with_prompt(t!("init.case_selection_prompt", locale = language).to_string())
        .items(&options.iter().map(|o| o.1.clone()).collect::<Vec<_>>())
        .interact()
        .context(t!("init.confirm_failed", locale = language).to_string())?;

    if selections.is_empty() {
        println!("{}", t!("init.no_cases_selected", locale = language).yellow());
    }

    let mut selected_cases = Vec::new();

    for i in selections {
        let selection_key = options[i].0;
        let case = match selection_key {
            "python_venv" => {
                let package: String = Input::with_theme(&theme)
                    .with_prompt(t!("init.package_prompt", locale = language).to_string())
                    .interact_text()?;
                let module: String = Input::with_theme(&theme)
                    .with_prompt(t!("init.import_prompt", locale = language).to_string())
                    .interact_text()?;
                python_venv_case("python-venv", &package, None, &module)
            }
            "pinned_dep" => {
                let pinned: String = Input::with_theme(&theme)
                    .with_prompt(t!("init.pinned_dep_prompt", locale = language).to_string())
                    .interact_text()?;
                let package: String = Input::with_theme(&theme)
                    .with_prompt(t!("init.package_prompt", locale = language).to_string())
                    .interact_text()?;
                let module: String = Input::with_theme(&theme)
                    .with_prompt(t!("init.import_prompt", locale = language).to_string())
                    .interact_text()?;
                python_venv_case("pinned-dependency", &package, Some(&pinned), &module)
            }
            "custom" => {
                let name: String = Input::with_theme(&theme)
                    .with_prompt(t!("init.custom_name_prompt", locale = language).to_string())
                    .interact_text()?;
                let setup: String = Input::with_theme(&theme)
                    .with_prompt(t!("init.custom_setup_prompt", locale = language).to_string())
                    .interact_text()?;
                let verify: String = Input::with_theme(&theme)
                    .with_prompt(t!("init.custom_verify_prompt", locale = language).to_string())
                    .interact_text()?;
                CaseSpec {
                    name,
                    setup: vec![setup],
                    verify,
                    timeout_secs: Some(600),
                    ..CaseSpec::default()
                }
            }
            _ => continue,
        };
        selected_cases.push(case);
    }

    let final_matrix = if selected_cases.is_empty() {
        default_matrix
    } else {
        EnvMatrix {
            language: language.to_string(),
            cases: selected_cases,
            ..default_matrix
        }
    };

    write_config(config_path, &final_matrix, language)
}

/// Builds the "fresh virtualenv, install, import" case shape. Steps address
/// the environment through `{env}` so no activation state is needed.
fn python_venv_case(
    name: &str,
    package: &str,
    pinned: Option<&str>,
    import_module: &str,
) -> CaseSpec {
    let mut setup = vec!["python3 -m venv {env}".to_string()];
    if let Some(dep) = pinned {
        setup.push(format!("{{env}}/bin/pip install --quiet {}", dep));
    }
    setup.push(format!("{{env}}/bin/pip install --quiet {}", package));

    CaseSpec {
        name: name.to_string(),
        setup,
        verify: format!("{{env}}/bin/python -c 'import {}'", import_module),
        timeout_secs: Some(600),
        ..CaseSpec::default()
    }
}

/// The default matrix: the dependency-version compatibility check this tool
/// grew out of. Two pinned versions of the same serialization library, plus
/// a framework that pins one of them itself.
fn generate_default_matrix(language: &str) -> EnvMatrix {
    let project_install = "{env}/bin/pip install --quiet .".to_string();

    EnvMatrix {
        language: language.to_string(),
        env_root: None,
        output_cap: crate::core::config::DEFAULT_OUTPUT_CAP,
        cases: vec![
            CaseSpec {
                name: "protobuf-5x".to_string(),
                setup: vec![
                    "python3 -m venv {env}".to_string(),
                    "{env}/bin/pip install --quiet protobuf==5.29.0".to_string(),
                    project_install.clone(),
                ],
                verify: "{env}/bin/python -c 'import mem0'".to_string(),
                timeout_secs: Some(600),
                ..CaseSpec::default()
            },
            CaseSpec {
                name: "protobuf-6x".to_string(),
                setup: vec![
                    "python3 -m venv {env}".to_string(),
                    "{env}/bin/pip install --quiet protobuf==6.33.0".to_string(),
                    project_install.clone(),
                ],
                verify: "{env}/bin/python -c 'import mem0'".to_string(),
                timeout_secs: Some(600),
                ..CaseSpec::default()
            },
            CaseSpec {
                name: "langgraph".to_string(),
                setup: vec![
                    "python3 -m venv {env}".to_string(),
                    "{env}/bin/pip install --quiet langgraph-api==0.5.7".to_string(),
                    project_install,
                ],
                verify: "{env}/bin/python -c 'from mem0 import Memory'".to_string(),
                timeout_secs: Some(600),
                ..CaseSpec::default()
            },
        ],
    }
}

fn write_config(path: &Path, matrix: &EnvMatrix, language: &str) -> Result<()> {
    let toml_string = toml::to_string_pretty(matrix)
        .context(t!("init.serialize_failed", locale = language).to_string())?;

    fs::write(path, toml_string).with_context(|| {
        t!("init.write_failed", locale = language, path = path.display()).to_string()
    })?;

    println!(
        "\n{} {}",
        "✔".green(),
        t!("init.success_created", locale = language, path = path.display()).bold()
    );
    println!("{}", t!("init.usage_hint", locale = language));

    Ok(())
}
