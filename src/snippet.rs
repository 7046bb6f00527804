//! Ready-to-paste test code for a locator.

use std::fmt;

use clap::ValueEnum;
use locator_core::ConfidenceTier;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Framework {
    Cypress,
    SeleniumJava,
    SeleniumPython,
    Playwright,
}

impl Framework {
    pub fn all() -> [Framework; 4] {
        [
            Framework::Cypress,
            Framework::SeleniumJava,
            Framework::SeleniumPython,
            Framework::Playwright,
        ]
    }

    pub fn id(self) -> &'static str {
        match self {
            Framework::Cypress => "cypress",
            Framework::SeleniumJava => "selenium-java",
            Framework::SeleniumPython => "selenium-python",
            Framework::Playwright => "playwright",
        }
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Renders a click, a wait and (where the framework has one) a text read
/// for `expression`, headed by a status comment naming the tier.
pub fn render_snippet(framework: Framework, expression: &str, tier: ConfidenceTier) -> String {
    let status = format!("Status: {} ({})", tier.label(), tier.colour());
    let xpath = quoted(expression);

    match framework {
        Framework::Cypress => format!(
            "// {status}\n\
             cy.xpath({xpath}).click();\n\
             \n\
             // Or wait for the element\n\
             cy.xpath({xpath}).should('be.visible');\n\
             \n\
             // Read its text\n\
             cy.xpath({xpath}).invoke('text').then((text) => {{\n  cy.log(text);\n}});"
        ),
        Framework::SeleniumJava => format!(
            "// {status}\n\
             WebElement element = driver.findElement(By.xpath({xpath}));\n\
             element.click();\n\
             \n\
             // Or with an explicit wait\n\
             WebDriverWait wait = new WebDriverWait(driver, Duration.ofSeconds(10));\n\
             WebElement clickable = wait.until(ExpectedConditions.elementToBeClickable(By.xpath({xpath})));\n\
             clickable.click();"
        ),
        Framework::SeleniumPython => format!(
            "# {status}\n\
             element = driver.find_element(By.XPATH, {xpath})\n\
             element.click()\n\
             \n\
             # Or with an explicit wait\n\
             from selenium.webdriver.support.wait import WebDriverWait\n\
             from selenium.webdriver.support import expected_conditions as EC\n\
             \n\
             element = WebDriverWait(driver, 10).until(\n    EC.element_to_be_clickable((By.XPATH, {xpath}))\n)\n\
             element.click()"
        ),
        Framework::Playwright => {
            let selector = quoted(&format!("xpath={expression}"));
            format!(
                "// {status}\n\
                 await page.locator({selector}).click();\n\
                 \n\
                 // Or wait for the element\n\
                 await page.locator({selector}).waitFor();\n\
                 \n\
                 // Read its text\n\
                 const text = await page.locator({selector}).textContent();\n\
                 console.log(text);"
            )
        }
    }
}

/// Double-quoted literal valid in JavaScript, Java and Python.
fn quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_framework_embeds_expression_and_tier() {
        for framework in Framework::all() {
            let snippet = render_snippet(framework, "//*[@id='go']", ConfidenceTier::Reliable);
            assert!(snippet.contains("Status: Reliable (green)"), "{framework}");
            assert!(snippet.contains("//*[@id='go']"), "{framework}");
        }
    }

    #[test]
    fn cypress_layout() {
        let snippet = render_snippet(Framework::Cypress, "//button[1]", ConfidenceTier::Weak);
        let lines: Vec<&str> = snippet.lines().collect();
        assert_eq!(lines[0], "// Status: Weak (red)");
        assert_eq!(lines[1], "cy.xpath(\"//button[1]\").click();");
        assert!(snippet.ends_with("});"));
    }

    #[test]
    fn python_uses_hash_comments() {
        let snippet =
            render_snippet(Framework::SeleniumPython, "//a", ConfidenceTier::Caution);
        assert!(snippet.starts_with("# Status: Caution (yellow)\n"));
        assert!(snippet.contains("driver.find_element(By.XPATH, \"//a\")"));
    }

    #[test]
    fn double_quotes_are_escaped() {
        let snippet = render_snippet(
            Framework::Playwright,
            r#"//p[text()='say "hi"']"#,
            ConfidenceTier::Caution,
        );
        assert!(snippet.contains(r#"page.locator("xpath=//p[text()='say \"hi\"']").click();"#));
    }

    #[test]
    fn framework_ids_match_serde() {
        for framework in Framework::all() {
            let json = serde_json::to_string(&framework).expect("json");
            assert_eq!(json, format!("\"{}\"", framework.id()));
        }
    }
}
