//! Common constants used throughout pyskel.

/// Option names understood by the standard model and the rule set.
pub mod options {
    pub const FULL_NAME: &str = "full_name";
    pub const EMAIL: &str = "email";
    pub const PROJECT_NAME: &str = "project_name";
    pub const PROJECT_SLUG: &str = "project_slug";
    pub const LICENSE: &str = "license";
    pub const COMMAND_LINE_INTERFACE: &str = "command_line_interface";
    pub const DOCUMENTATION_FRAMEWORK: &str = "documentation_framework";
    pub const TEST_AUTOMATION_TOOL: &str = "test_automation_tool";
    pub const HAVE_TESTS: &str = "have_tests";
    pub const CREATE_AUTHOR_FILE: &str = "create_author_file";
}

/// Files and directories of a rendered project skeleton.
pub mod files {
    pub const LICENSE: &str = "LICENSE";
    pub const AUTHORS: &str = "AUTHORS.rst";
    pub const SETUP: &str = "setup.py";
    pub const SRC_DIR: &str = "src";
    pub const CLI_MODULE: &str = "cli.py";
    pub const MAIN_MODULE: &str = "__main__.py";
    pub const DOCS_DIR: &str = "docs";
    pub const DOCS_SOURCE_DIR: &str = "source";
    pub const SPHINX_CONF: &str = "conf.py";
    pub const MKDOCS_CONFIG: &str = "mkdocs.yml";
    pub const AUTHORS_PAGE_STEM: &str = "authors";
    pub const NOX_FILE: &str = "noxfile.py";
    pub const TOX_FILE: &str = "tox.ini";
    pub const PYTEST_CONFIG: &str = "pytest.ini";
    pub const FIXTURE_MODULE: &str = "conftest.py";
    pub const TESTS_DIR: &str = "tests";
}

/// Suffix marking skeleton files whose content is rendered.
pub const TEMPLATE_SUFFIX: &str = ".j2";

/// Supported answers file names, tried in order when a directory is given.
pub const ANSWERS_FILES: [&str; 3] = ["answers.json", "answers.yml", "answers.yaml"];
