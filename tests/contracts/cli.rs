//! CLI contracts
//!
//! Priority: CLI flags > DOCPROXY_* env vars > docproxy.toml > user config

use crate::common::*;

const PROJECT_CONFIG: &str = r#"
[proxy]
dir = "var/proxies"
namespace = "Proxies"

[mapping]
path = "mapping.toml"
"#;

fn project() -> TestEnv {
    let env = TestEnv::new();
    env.write_project_file("mapping.toml", BLOG_MAPPING);
    env.write_project_file("docproxy.toml", PROJECT_CONFIG);
    env
}

/// CONTRACT: generate writes one stand-in per instantiable mapped type
mod generate {
    use super::*;

    #[test]
    fn contract_generate_reports_counts() {
        let env = project();

        let result = env.run(&["generate", "--json"]);

        assert!(result.success, "generate failed: {}", result.stderr);
        let output = result.json();
        assert_eq!(output["event"], "generated");
        assert_eq!(output["count"], 2);
        assert_eq!(output["skipped"], 2);
        assert_eq!(
            env.list_dir(&env.project_path("var/proxies")),
            vec!["__CG__appPost.rs", "__CG__appUser.rs"]
        );
    }

    #[test]
    fn contract_dest_flag_overrides_config_and_env() {
        let env = project();

        let result = env.run_with_env(
            &["generate", "--dest", "out"],
            &[("DOCPROXY_PROXY_DIR", "from-env")],
        );

        assert!(result.success, "generate failed: {}", result.stderr);
        assert_eq!(env.list_dir(&env.project_path("out")).len(), 2);
        assert!(!env.project_path("from-env").exists());
        assert!(!env.project_path("var/proxies").exists());
    }

    #[test]
    fn contract_env_overrides_project_config() {
        let env = project();

        let result = env.run_with_env(&["generate"], &[("DOCPROXY_PROXY_DIR", "from-env")]);

        assert!(result.success, "generate failed: {}", result.stderr);
        assert_eq!(env.list_dir(&env.project_path("from-env")).len(), 2);
    }

    #[test]
    fn contract_missing_namespace_fails() {
        let env = TestEnv::new();
        env.write_project_file("mapping.toml", BLOG_MAPPING);
        env.write_project_file("docproxy.toml", "[proxy]\ndir = \"var/proxies\"\n");

        let result = env.run(&["generate", "--mapping", "mapping.toml"]);

        assert!(!result.success);
        assert!(
            result.stderr.contains("You must configure a proxy namespace"),
            "unexpected stderr: {}",
            result.stderr
        );
    }

    #[test]
    fn contract_invalid_mode_in_env_fails_fast() {
        let env = project();

        let result = env.run_with_env(&["generate"], &[("DOCPROXY_AUTO_GENERATE", "sometimes")]);

        assert!(!result.success);
        assert!(
            result
                .stderr
                .contains("Invalid auto generate mode \"sometimes\" given."),
            "unexpected stderr: {}",
            result.stderr
        );
    }
}

/// CONTRACT: resolve strips the stand-in decoration and nothing else
mod resolve {
    use super::*;

    #[test]
    fn contract_resolve_prints_target() {
        let env = TestEnv::new();

        let result = env.run(&["resolve", "Proxies::__CG__::app::User"]);

        assert!(result.success, "resolve failed: {}", result.stderr);
        insta::assert_snapshot!(result.stdout.trim(), @"app::User");
    }

    #[test]
    fn contract_resolve_json() {
        let env = TestEnv::new();

        let result = env.run(&["resolve", "app::User", "--json"]);

        assert!(result.success, "resolve failed: {}", result.stderr);
        let output = result.json();
        assert_eq!(output["target"], "app::User");
        assert_eq!(output["stand_in"], false);
    }
}
