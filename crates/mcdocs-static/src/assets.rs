//! Asset pipeline: theme stylesheet, runtime script and static files.

use std::fs;
use std::io;
use std::path::Path;

use walkdir::WalkDir;

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// Generate the theme stylesheet.
    pub fn generate_css() -> String {
        DEFAULT_CSS.to_string()
    }

    /// Generate the runtime script (code block copy buttons).
    pub fn generate_js() -> String {
        DEFAULT_JS.to_string()
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }

    /// Copy every file under `src` into `dest`, keeping relative paths.
    ///
    /// Returns the number of files copied.
    pub fn copy_dir(src: &Path, dest: &Path) -> io::Result<usize> {
        let mut copied = 0;

        for entry in WalkDir::new(src).follow_links(true) {
            let entry = entry.map_err(io::Error::other)?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry.path().strip_prefix(src).map_err(io::Error::other)?;
            let target = dest.join(relative);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }

        Ok(copied)
    }
}

const DEFAULT_CSS: &str = r#"/* mcdocs theme */

:root {
  --primary: #2e8555;
  --primary-dark: #29784c;
  --primary-contrast: #ffffff;
  --secondary: #ebedf0;
  --foreground: #1c1e21;
  --muted-foreground: #606770;
  --background: #ffffff;
  --border: #dadde1;
  --code-background: #f6f7f8;
  --footer-dark: #303846;
  --navbar-height: 3.75rem;
  --sidebar-width: 300px;
  --toc-width: 220px;
  --content-max-width: 860px;
  --radius: 0.4rem;
}

* {
  box-sizing: border-box;
  margin: 0;
  padding: 0;
}

body {
  font-family: system-ui, -apple-system, "Segoe UI", Roboto, Ubuntu, sans-serif;
  background: var(--background);
  color: var(--foreground);
  line-height: 1.65;
  display: flex;
  flex-direction: column;
  min-height: 100vh;
}

a {
  color: var(--primary);
  text-decoration: none;
}

a:hover {
  text-decoration: underline;
}

.container {
  max-width: 1140px;
  margin: 0 auto;
  padding: 0 1rem;
}

.row {
  display: flex;
  flex-wrap: wrap;
  margin: 0 -1rem;
}

.col {
  flex: 1 0;
  padding: 0 1rem;
}

.col--4 {
  flex: 0 0 33.333%;
  max-width: 33.333%;
}

.text--center {
  text-align: center;
}

.padding-horiz--md {
  padding-left: 1rem;
  padding-right: 1rem;
}

/* Navbar */
.navbar {
  height: var(--navbar-height);
  box-shadow: 0 1px 2px rgba(0, 0, 0, 0.1);
  padding: 0.5rem 1rem;
  position: sticky;
  top: 0;
  background: var(--background);
  z-index: 10;
}

.navbar__inner {
  display: flex;
  justify-content: space-between;
  height: 100%;
}

.navbar__items {
  display: flex;
  align-items: center;
  gap: 0.25rem;
}

.navbar__brand {
  display: flex;
  align-items: center;
  margin-right: 1rem;
  color: var(--foreground);
}

.navbar__logo {
  height: 2rem;
  margin-right: 0.5rem;
}

.navbar__link {
  padding: 0.25rem 0.75rem;
  color: var(--foreground);
  font-weight: 500;
}

.navbar__link:hover {
  color: var(--primary);
  text-decoration: none;
}

.main-wrapper {
  flex: 1 0 auto;
}

/* Hero */
.hero {
  padding: 4rem 0;
  text-align: center;
}

.hero--primary {
  background: var(--primary);
  color: var(--primary-contrast);
}

.hero__image {
  height: 8rem;
  margin-bottom: 1rem;
}

.hero__title {
  font-size: 3rem;
  font-weight: 700;
}

.hero__subtitle {
  font-size: 1.5rem;
  margin: 0.5rem 0 1.5rem;
}

.buttons {
  display: flex;
  align-items: center;
  justify-content: center;
  gap: 1rem;
}

.button {
  display: inline-block;
  border: 2px solid var(--secondary);
  border-radius: var(--radius);
  font-weight: 700;
  padding: 0.375rem 1.5rem;
  cursor: pointer;
}

.button--secondary {
  background: var(--secondary);
  color: var(--foreground);
}

.button--outline {
  background: transparent;
  color: var(--primary-contrast);
}

.button--lg {
  font-size: 1.1rem;
  padding: 0.5rem 2rem;
}

.button:hover {
  text-decoration: none;
  opacity: 0.9;
}

/* Features */
.features {
  display: flex;
  align-items: center;
  padding: 2rem 0;
  width: 100%;
}

.features h3 {
  font-size: 1.25rem;
  margin-bottom: 0.5rem;
}

.features code,
.markdown code {
  font-family: ui-monospace, SFMono-Regular, Menlo, monospace;
  font-size: 0.9em;
  background: var(--code-background);
  border-radius: 0.25rem;
  padding: 0.1rem 0.3rem;
}

/* Doc layout */
.doc-layout {
  display: grid;
  grid-template-columns: var(--sidebar-width) minmax(0, 1fr) var(--toc-width);
  gap: 2rem;
}

.doc-sidebar {
  border-right: 1px solid var(--border);
  padding: 1rem;
  position: sticky;
  top: var(--navbar-height);
  height: calc(100vh - var(--navbar-height));
  overflow-y: auto;
}

.menu__list {
  list-style: none;
}

.menu__list .menu__list {
  margin-left: 1rem;
}

.menu__category {
  display: block;
  font-weight: 600;
  padding: 0.375rem 0.75rem;
}

.menu__link {
  display: block;
  padding: 0.375rem 0.75rem;
  border-radius: var(--radius);
  color: var(--muted-foreground);
}

.menu__link:hover {
  background: var(--secondary);
  text-decoration: none;
}

.menu__list-item--active > .menu__link {
  color: var(--primary);
  background: var(--secondary);
}

.doc-main {
  max-width: var(--content-max-width);
  padding: 2rem 0;
}

.markdown h1 {
  font-size: 2.5rem;
  margin-bottom: 1.5rem;
}

.markdown h2 {
  font-size: 1.75rem;
  margin: 2rem 0 1rem;
}

.markdown h3 {
  font-size: 1.25rem;
  margin: 1.5rem 0 0.75rem;
}

.markdown p,
.markdown ul,
.markdown ol,
.markdown table {
  margin-bottom: 1.25rem;
}

.markdown ul,
.markdown ol {
  padding-left: 2rem;
}

.markdown pre {
  background: var(--code-background);
  border-radius: var(--radius);
  padding: 1rem;
  overflow-x: auto;
  margin-bottom: 1.25rem;
  position: relative;
}

.markdown pre code {
  background: none;
  padding: 0;
}

.copy-btn {
  position: absolute;
  top: 0.5rem;
  right: 0.5rem;
  font-size: 0.75rem;
  padding: 0.125rem 0.5rem;
  border: 1px solid var(--border);
  border-radius: var(--radius);
  background: var(--background);
  cursor: pointer;
}

.edit-this-page {
  display: inline-block;
  margin-top: 2rem;
}

.pagination-nav {
  display: grid;
  grid-template-columns: 1fr 1fr;
  gap: 1rem;
  margin-top: 2rem;
}

.pagination-nav__link {
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 1rem;
  color: var(--foreground);
}

.pagination-nav__link--next {
  grid-column: 2;
  text-align: right;
}

.pagination-nav__sublabel {
  font-size: 0.875rem;
  color: var(--muted-foreground);
}

.pagination-nav__label {
  font-weight: 700;
}

/* Table of contents */
.toc {
  position: sticky;
  top: calc(var(--navbar-height) + 1rem);
  padding: 2rem 0;
  font-size: 0.875rem;
}

.toc ul {
  list-style: none;
  border-left: 1px solid var(--border);
  padding-left: 0.5rem;
}

.toc a {
  color: var(--muted-foreground);
}

.toc-level-3 {
  padding-left: 1rem;
}

/* Footer */
.footer {
  padding: 2rem 0;
}

.footer--dark {
  background: var(--footer-dark);
  color: #ebedf0;
}

.footer--light {
  background: var(--secondary);
}

.footer__title {
  font-weight: 700;
  margin-bottom: 0.5rem;
}

.footer__items {
  list-style: none;
}

.footer__link-item {
  color: inherit;
  line-height: 2;
}

.footer__copyright {
  text-align: center;
  margin-top: 1.5rem;
}

.not-found {
  padding: 4rem 1rem;
}

@media (max-width: 996px) {
  .col--4 {
    flex: 0 0 100%;
    max-width: 100%;
  }

  .doc-layout {
    grid-template-columns: minmax(0, 1fr);
  }

  .doc-sidebar,
  .toc {
    display: none;
  }

  .doc-main {
    padding: 2rem 1rem;
  }
}
"#;

const DEFAULT_JS: &str = r#"// mcdocs runtime
(function() {
  document.querySelectorAll('.markdown pre').forEach((pre) => {
    const btn = document.createElement('button');
    btn.className = 'copy-btn';
    btn.textContent = 'Copy';
    btn.addEventListener('click', async () => {
      const code = pre.querySelector('code');
      try {
        await navigator.clipboard.writeText(code ? code.textContent : pre.textContent);
        btn.textContent = 'Copied!';
      } catch (err) {
        btn.textContent = 'Error';
      }
      setTimeout(() => { btn.textContent = 'Copy'; }, 2000);
    });
    pre.appendChild(btn);
  });
})();
"#;
