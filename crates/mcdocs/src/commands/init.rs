//! Scaffold the multicommand documentation site.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use mcdocs_static::MULTICOMMAND_SITE_TOML;

/// Files written by `init`, relative to the config directory.
const SCAFFOLD: &[(&str, &str)] = &[
    ("docs/installation.md", INSTALLATION_DOC),
    ("docs/introduction.md", INTRODUCTION_DOC),
    ("docs/basic-usage.md", BASIC_USAGE_DOC),
    ("docs/examples/simple.md", SIMPLE_EXAMPLE_DOC),
    ("static/img/logo.svg", LOGO_SVG),
    ("static/img/favicon.svg", LOGO_SVG),
    ("src/css/custom.css", CUSTOM_CSS),
];

/// Run the init command.
pub async fn run(config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing mcdocs...");

    let root = config_path.parent().unwrap_or_else(|| Path::new(""));

    if config_path.exists() && !yes {
        tracing::warn!(
            "{} already exists. Use --yes to overwrite.",
            config_path.display()
        );
        return Ok(());
    }

    if !root.as_os_str().is_empty() {
        fs::create_dir_all(root).context("Failed to create site directory")?;
    }
    fs::write(config_path, MULTICOMMAND_SITE_TOML)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    tracing::info!("Created {}", config_path.display());

    for (relative, content) in SCAFFOLD {
        let path = root.join(relative);
        if path.exists() && !yes {
            tracing::debug!("Keeping existing {}", path.display());
            continue;
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("Created {}", relative);
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'mcdocs build' to build the site.");

    Ok(())
}

const INSTALLATION_DOC: &str = r#"---
sidebar_position: 1
---

# Installation

multicommand is a single module with no dependencies outside the standard library.

## Using pip

```bash
pip install multicommand
```

## Vendoring

Since the package is one file, you can also copy `multicommand.py` into your project.

Next, read the [introduction](./introduction.md).
"#;

const INTRODUCTION_DOC: &str = r#"---
sidebar_position: 2
---

# Introduction

multicommand builds nested subcommand CLIs from the layout of a Python package.
Each module under a `commands` package defines a module-level `parser`, and
the module's path becomes the command path:

```
mypkg/
├── cli.py
└── commands/
    ├── server/
    │   ├── start.py
    │   └── stop.py
    └── version.py
```

gives you `mycli server start`, `mycli server stop` and `mycli version`.

Head to [Basic Usage](./basic-usage.md) to build one.
"#;

const BASIC_USAGE_DOC: &str = r#"---
title: Basic Usage
sidebar_position: 3
---

# Basic Usage

## Defining commands

Every command module exposes an `argparse.ArgumentParser` named `parser`:

```python
# mypkg/commands/version.py
import argparse

parser = argparse.ArgumentParser(description="Print the version")
parser.set_defaults(handler=lambda args: print("1.0.0"))
```

## Creating the parser

Point `create_parser` at the commands package:

```python
# mypkg/cli.py
import multicommand
from . import commands

def main():
    parser = multicommand.create_parser(commands)
    args = parser.parse_args()
    if hasattr(args, "handler"):
        args.handler(args)
        return
    parser.print_help()
```

## Index parsers

A module named `_index.py` customizes the parser of its enclosing directory.
Directories without one get an empty parser.

See the [calculator example](./examples/simple.md) for a complete CLI.
"#;

const SIMPLE_EXAMPLE_DOC: &str = r#"---
sidebar_position: 1
description: A calculator CLI built with multicommand
---

# Simple

A calculator with binary and unary operations:

```
calculator/
├── cli.py
└── commands/
    ├── binary/
    │   ├── add.py
    │   ├── divide.py
    │   ├── multiply.py
    │   └── subtract.py
    └── unary/
        └── negate.py
```

```bash
$ calculator binary add 1 2
3.0
$ calculator unary negate 5
-5.0
```

Each file follows the pattern from [Basic Usage](../basic-usage.md#defining-commands).
"#;

const LOGO_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 64 64"><rect width="64" height="64" rx="12" fill="#2e8555"/><text x="32" y="42" font-family="monospace" font-size="28" text-anchor="middle" fill="#fff">mc</text></svg>
"##;

const CUSTOM_CSS: &str = r#"/* Overrides applied after the mcdocs theme */
:root {
  --primary: #2e8555;
  --primary-dark: #29784c;
}
"#;
