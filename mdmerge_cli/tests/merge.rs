mod common;

use clap::Parser;
use mdmerge_cli::ExportTargetArg;
use mdmerge_cli::MdmergeCli;
use mdmerge_core::AnyEmptyResult;
use mdmerge_core::ExportTarget;
use mdmerge_core::MergeOptions;
use predicates::prelude::PredicateBooleanExt;
use rstest::rstest;
use similar_asserts::assert_eq;

#[test]
fn merge_prints_to_stdout() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("main.md"), "# Book\n\n<<[chapter.md]\n")?;
	std::fs::write(tmp.path().join("chapter.md"), "Chapter text.\n")?;

	common::mdmerge_cmd()
		.current_dir(tmp.path())
		.arg("main.md")
		.assert()
		.success()
		.stdout("# Book\n\nChapter text.\n");

	Ok(())
}

#[test]
fn merge_several_inputs_in_order() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("one.md"), "Title: Book\n\nOne\n")?;
	std::fs::write(tmp.path().join("two.md"), "Title: Ignored\n\nTwo\n")?;

	common::mdmerge_cmd()
		.current_dir(tmp.path())
		.args(["one.md", "two.md"])
		.assert()
		.success()
		.stdout("Title: Book\n\nOne\n\nTwo\n");

	Ok(())
}

#[test]
fn merge_writes_outfile() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("main.md"), "Intro\n{{part.md}}\n")?;
	std::fs::write(tmp.path().join("part.md"), "Part\n")?;

	common::mdmerge_cmd()
		.current_dir(tmp.path())
		.args(["main.md", "--outfile", "merged.md"])
		.assert()
		.success()
		.stdout("");

	let merged = std::fs::read_to_string(tmp.path().join("merged.md"))?;
	assert_eq!(merged, "Intro\nPart\n");

	Ok(())
}

#[test]
fn merge_fails_on_missing_include() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("main.md"), "<<[missing.md]\n")?;

	common::mdmerge_cmd()
		.current_dir(tmp.path())
		.args(["main.md", "-o", "merged.md"])
		.assert()
		.code(2)
		.stdout("")
		.stderr(predicates::str::contains("source not found"));

	assert!(!tmp.path().join("merged.md").exists());

	Ok(())
}

#[test]
fn merge_fails_on_missing_input() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::mdmerge_cmd()
		.current_dir(tmp.path())
		.arg("nope.md")
		.assert()
		.code(2)
		.stderr(predicates::str::contains("source not found"));

	Ok(())
}

#[test]
fn merge_fails_on_inclusion_cycle() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("a.md"), "<<[b.md]\n")?;
	std::fs::write(tmp.path().join("b.md"), "{{a.md}}\n")?;

	common::mdmerge_cmd()
		.current_dir(tmp.path())
		.arg("a.md")
		.assert()
		.code(2)
		.stderr(predicates::str::contains("inclusion cycle"));

	Ok(())
}

#[test]
fn merge_rejects_stdin_with_files() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("a.md"), "A\n")?;

	common::mdmerge_cmd()
		.current_dir(tmp.path())
		.args(["-", "a.md"])
		.assert()
		.code(2)
		.stderr(predicates::str::contains("standard input"));

	Ok(())
}

#[test]
fn merge_reads_stdin() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("a.md"), "A\n")?;

	common::mdmerge_cmd()
		.current_dir(tmp.path())
		.arg("-")
		.write_stdin("Top\n<<[a.md]\n")
		.assert()
		.success()
		.stdout("Top\nA\n");

	Ok(())
}

#[test]
fn merge_reads_book_from_stdin() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("a.md"), "A\n")?;
	std::fs::write(tmp.path().join("b.md"), "B\n")?;

	common::mdmerge_cmd()
		.current_dir(tmp.path())
		.args(["--book", "-"])
		.write_stdin("a.md\nb.md\n")
		.assert()
		.success()
		.stdout("A\n\nB\n");

	Ok(())
}

#[test]
fn merge_leanpub_book() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("Book.txt"), "intro.md\n\tchapter.md\n")?;
	std::fs::write(tmp.path().join("intro.md"), "# Intro\n")?;
	std::fs::write(tmp.path().join("chapter.md"), "# Chapter\n")?;

	common::mdmerge_cmd()
		.current_dir(tmp.path())
		.args(["--leanpub", "Book.txt"])
		.assert()
		.success()
		.stdout("# Intro\n\n## Chapter\n");

	Ok(())
}

#[rstest]
#[case::default_target(&[], "HTML\n")]
#[case::latex(&["--export-target", "latex"], "LaTeX\n")]
fn merge_substitutes_wildcards(#[case] flags: &[&str], #[case] expected: &str) -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("main.md"), "{{figure.*}}\n")?;
	std::fs::write(tmp.path().join("figure.html"), "HTML\n")?;
	std::fs::write(tmp.path().join("figure.tex"), "LaTeX\n")?;

	common::mdmerge_cmd()
		.current_dir(tmp.path())
		.args(flags)
		.arg("main.md")
		.assert()
		.success()
		.stdout(expected.to_string());

	Ok(())
}

#[test]
fn merge_uses_config_file() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(
		tmp.path().join("mdmerge.toml"),
		"export_target = \"latex\"\nignore_transclusions = true\n",
	)?;
	std::fs::write(tmp.path().join("main.md"), "{{keep.md}}\n<<[figure.*]\n")?;
	std::fs::write(tmp.path().join("figure.tex"), "LaTeX\n")?;
	std::fs::write(tmp.path().join("figure.rtf"), "RTF\n")?;

	common::mdmerge_cmd()
		.current_dir(tmp.path())
		.arg("main.md")
		.assert()
		.success()
		.stdout("{{keep.md}}\nLaTeX\n");

	common::mdmerge_cmd()
		.current_dir(tmp.path())
		.args(["--export-target", "rtf", "main.md"])
		.assert()
		.success()
		.stdout("{{keep.md}}\nRTF\n");

	Ok(())
}

#[test]
fn merge_skips_config_with_no_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("mdmerge.toml"), "not valid toml =")?;
	std::fs::write(tmp.path().join("main.md"), "Plain\n")?;

	common::mdmerge_cmd()
		.current_dir(tmp.path())
		.arg("main.md")
		.assert()
		.code(2)
		.stderr(predicates::str::contains("failed to parse config file"));

	common::mdmerge_cmd()
		.current_dir(tmp.path())
		.args(["--no-config", "main.md"])
		.assert()
		.success()
		.stdout("Plain\n");

	Ok(())
}

#[test]
fn merge_just_raw() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("main.md"), "<<[x.md]\n<!-- <<{y.html} -->\n")?;
	std::fs::write(tmp.path().join("y.html"), "<b>raw</b>\n")?;

	common::mdmerge_cmd()
		.current_dir(tmp.path())
		.args(["--just-raw", "main.md"])
		.assert()
		.success()
		.stdout("<<[x.md]\n<b>raw</b>\n");

	Ok(())
}

#[test]
fn merge_rejects_directory_outfile() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("main.md"), "Text\n")?;
	std::fs::create_dir(tmp.path().join("out"))?;

	common::mdmerge_cmd()
		.current_dir(tmp.path())
		.args(["main.md", "-o", "out"])
		.assert()
		.code(2)
		.stderr(predicates::str::contains("invalid output file"));

	common::mdmerge_cmd()
		.current_dir(tmp.path())
		.args(["main.md", "-o", "missing/merged.md"])
		.assert()
		.code(2)
		.stderr(predicates::str::contains("invalid output file"));

	Ok(())
}

#[test]
fn merge_verbose_logs_to_stderr() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("main.md"), "<<[a.md]\n")?;
	std::fs::write(tmp.path().join("a.md"), "A\n")?;

	common::mdmerge_cmd()
		.current_dir(tmp.path())
		.args(["--verbose", "main.md"])
		.assert()
		.success()
		.stdout("A\n")
		.stderr(
			predicates::str::contains("resolving directive")
				.and(predicates::str::contains("file include")),
		);

	Ok(())
}

#[test]
fn cli_requires_an_input() {
	assert!(MdmergeCli::try_parse_from(["mdmerge"]).is_err());
}

#[test]
fn cli_options_leave_export_target_unset_by_default() -> AnyEmptyResult {
	let cli = MdmergeCli::try_parse_from(["mdmerge", "--leanpub", "book.txt"])?;
	assert_eq!(cli.options(), MergeOptions {
		leanpub: true,
		..MergeOptions::default()
	});
	assert!(!cli.reads_stdin());

	Ok(())
}

#[test]
fn cli_options_from_flags() -> AnyEmptyResult {
	let cli = MdmergeCli::try_parse_from([
		"mdmerge",
		"--export-target",
		"odf",
		"--ignore-transclusions",
		"--just-raw",
		"--book",
		"-",
	])?;

	assert_eq!(cli.export_target, Some(ExportTargetArg::Odf));
	assert_eq!(cli.options(), MergeOptions {
		book: true,
		export_target: Some(ExportTarget::Odf),
		ignore_transclusions: true,
		just_raw: true,
		leanpub: false,
	});
	assert!(cli.reads_stdin());

	Ok(())
}

#[test]
fn cli_rejects_unknown_export_target() {
	assert!(MdmergeCli::try_parse_from(["mdmerge", "--export-target", "pdf", "a.md"]).is_err());
}
