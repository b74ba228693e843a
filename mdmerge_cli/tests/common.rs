use assert_cmd::Command;

pub fn mdmerge_cmd() -> Command {
	let mut cmd = Command::new(env!("CARGO_BIN_EXE_mdmerge"));
	cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
	cmd
}
