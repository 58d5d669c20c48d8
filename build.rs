fn main() {
    println!("cargo:rerun-if-env-changed=RANGEWATCH_CONFIG");
    println!("cargo:rerun-if-env-changed=RANGEWATCH_MODE");

    // Host builds (tests, simulation) have no ESP-IDF environment to export.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
