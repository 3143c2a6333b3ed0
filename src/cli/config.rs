use crate::error::{ReportError, Result};
use crate::fmt::Currency;
use crate::settings::{load_settings, save_settings, settings_path};

pub fn run(
    base_url: Option<String>,
    company: Option<String>,
    currency: Option<String>,
    export_dir: Option<String>,
) -> Result<()> {
    let mut settings = load_settings()?;
    let changed =
        base_url.is_some() || company.is_some() || currency.is_some() || export_dir.is_some();

    if let Some(url) = base_url {
        settings.base_url = url;
    }
    if let Some(name) = company {
        settings.company_name = name;
    }
    if let Some(code) = currency {
        settings.currency = code.parse::<Currency>().map_err(ReportError::Settings)?;
    }
    if let Some(dir) = export_dir {
        settings.export_dir = dir;
    }
    if changed {
        save_settings(&settings)?;
        println!("Saved {}", settings_path().display());
    }

    println!("Base URL:   {}", settings.base_url);
    println!(
        "Company:    {}",
        if settings.company_name.is_empty() { "(not set)" } else { &settings.company_name }
    );
    println!("Currency:   {}", settings.currency.code());
    println!("Export dir: {}", settings.export_dir().display());
    println!("Timeout:    {}s", settings.timeout_secs);
    Ok(())
}
