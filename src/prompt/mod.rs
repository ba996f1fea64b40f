use crate::context::{Blueprint, Template};

pub fn system_prompt_setup() -> String {
r#"You are a senior engineer responsible for bootstrapping new projects from an existing starter template.
You decide which additional packages a project needs before any code is written, and you express that decision
as shell commands using the package manager the template already uses.

Rules:
- Only suggest packages the blueprint actually needs that are NOT already installed.
- Prefer well-known, actively maintained packages; do not invent package names.
- One command per line. No explanations inside the command block.
- Never suggest commands that delete files, change global configuration, or touch anything outside the project."#
        .to_string()
}

fn dependency_list(template: &Template) -> String {
    let installed = template.installed();
    if installed.is_empty() {
        return "(none)".to_string();
    }
    let mut s = String::new();
    for dep in installed {
        s.push_str(" - ");
        s.push_str(dep);
        s.push('\n');
    }
    s
}

/// Initial user turn: the request, the blueprint and what the template
/// already ships with.
pub fn user_prompt_setup(query: &str, blueprint: &Blueprint, template: &Template) -> String {
    format!(
"User request:
{query}

Project blueprint:
{blueprint}

Starter template: {name}
{description}

Dependencies already installed in the template:
{deps}
Study the blueprint and the template. You will be asked for the setup commands that install whatever is still missing.",
query = query,
blueprint = blueprint.as_prompt_text(),
name = template.name,
description = template.description,
deps = dependency_list(template),
)
}

pub fn user_prompt_commands() -> String {
r#"Now list the commands needed to install the additional dependencies this project requires.

Return them inside a single ```bash fenced block, one command per line, in the order they should run.
If nothing else needs to be installed, return a block that only contains a `#` comment saying so."#
        .to_string()
}

/// Regeneration turn. `error` is quoted verbatim so the model sees exactly
/// what the shell reported.
pub fn user_prompt_regenerate(error: &str) -> String {
    format!(
"Running the previous setup commands failed with this error:

```
{error}
```

Reconsider your previous suggestions:
- If a version does not exist, try a different version or drop the version pin.
- If a package name is wrong, use the correct published name.
- If a package plainly does not exist, leave it out entirely.

Return the complete corrected list inside a single ```bash fenced block, one command per line.",
error = error,
)
}
