use cli_player::CliPlayer;
use netminer_core::run_game;

mod cli_player;

fn main() {
    env_logger::init();
    run_game(CliPlayer::new);
}
