//! Create command

use airlocal_core::provision::ProvisioningOrchestrator;
use airlocal_core::questions::collect_answers;
use airlocal_core::Answers;
use anyhow::{Context, Result};
use camino::Utf8Path;

use crate::cli::CreateArgs;
use crate::commands::{collaborators, load_config, require_docker};
use crate::output;
use crate::prompt::TerminalSource;

/// Parse an answers file, filtered the same way as interactive answers
pub fn read_answers(path: &Utf8Path) -> Result<Answers> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
    let answers: Answers =
        serde_json::from_str(&content).with_context(|| format!("Invalid answers in {}", path))?;
    Ok(answers.normalized())
}

pub async fn run(args: CreateArgs) -> Result<()> {
    let store = load_config()?;
    let settings = store.settings()?;

    let answers = match &args.answers {
        Some(path) => read_answers(path)?,
        None => collect_answers(&mut TerminalSource)?,
    };
    // Reject bad answers before touching docker
    answers.validate()?;

    let collaborators = collaborators(&store)?;
    require_docker(&collaborators).await?;

    let orchestrator = ProvisioningOrchestrator::new(&settings, collaborators);

    output::header(&format!("Creating {}", answers.hostname));
    let spinner = output::spinner("Provisioning environment...");
    let result = orchestrator.create(&answers).await;
    spinner.finish_and_clear();
    let report = result?;

    for warning in &report.warnings {
        output::warning(&warning.to_string());
    }

    output::success(&format!(
        "Successfully created {}",
        report.environment.primary_host()
    ));
    output::kv("Path", report.environment.path.as_str());
    output::kv("Hosts", &report.environment.hosts.hosts().join(", "));
    if answers.wordpress {
        output::kv(
            "Admin",
            &format!("http://{}/wp-admin/", report.environment.primary_host()),
        );
    }

    for note in &report.notes {
        output::info(note);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;

    #[test]
    fn test_read_answers_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(tmp.path().join("answers.json")).unwrap();
        std::fs::write(
            &path,
            r#"{"hostname": "docker.test", "wordpress": true, "wordpressType": "dev"}"#,
        )
        .unwrap();

        let answers = read_answers(&path).unwrap();
        assert_eq!(answers.hostname, "docker.test");
        assert_eq!(
            answers.install_type().unwrap(),
            airlocal_core::InstallType::Dev
        );
    }

    #[test]
    fn test_read_answers_filters_hosts() {
        let tmp = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(tmp.path().join("answers.json")).unwrap();
        std::fs::write(
            &path,
            r#"{"hostname": "https://docker.test/wp-admin", "addMoreHosts": true, "extraHosts": "a.test b.test"}"#,
        )
        .unwrap();

        let answers = read_answers(&path).unwrap();
        assert_eq!(answers.hostname, "docker.test");
        assert_eq!(answers.extra_hosts, ["a.test", "b.test"]);
    }

    #[test]
    fn test_read_answers_rejects_bad_json() {
        let tmp = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(tmp.path().join("answers.json")).unwrap();
        std::fs::write(&path, "{").unwrap();

        let err = read_answers(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid answers"));
    }
}
