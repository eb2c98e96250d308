fn main() {
    launchd_plist::app::cli::run();
}
