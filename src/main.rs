// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("filedrop=info"))
        .init();
    log::info!("file drop supported: {}", filedrop::file_drop_supported());
    filedrop::app::run()
}
