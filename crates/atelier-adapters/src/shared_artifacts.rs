//! Built-in shared scaffold artifacts.
//!
//! Every scaffold receives a fixed set of configuration files for its
//! template. The engine prefers the copy found in the source tree (under the
//! app root, redacted like any other file); the contents here are only used
//! when the tree has none.
//!
//! # Artifact sets
//!
//! | File                 | full-project | minimal-landing |
//! |----------------------|:------------:|:---------------:|
//! | `package.json`       | ✓            | ✓               |
//! | `tailwind.config.ts` | ✓            | ✓               |
//! | `next.config.ts`     | ✓            |                 |
//! | `tsconfig.json`      | ✓            | ✓               |
//! | `app/layout.tsx`     | ✓            | ✓               |
//! | `app/page.tsx`       | ✓            | ✓               |
//! | `app/globals.css`    | ✓            | ✓               |
//! | `lib/utils.ts`       | ✓            |                 |
//! | `lib/design-tokens.ts` | ✓          |                 |

use serde_json::json;
use tracing::{debug, instrument};

use atelier_core::{
    application::ports::{SharedArtifact, SharedArtifactSource},
    domain::{RelativePath, ScaffoldTemplate},
};

/// The shipped artifact set.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinArtifacts;

impl BuiltinArtifacts {
    pub fn new() -> Self {
        Self
    }
}

impl SharedArtifactSource for BuiltinArtifacts {
    #[instrument(skip(self))]
    fn artifacts(&self, template: ScaffoldTemplate) -> Vec<SharedArtifact> {
        let full = template == ScaffoldTemplate::FullProject;

        let mut set = vec![
            artifact("package.json", package_json(template)),
            artifact("tailwind.config.ts", TAILWIND_CONFIG.into()),
        ];
        if full {
            set.push(artifact("next.config.ts", NEXT_CONFIG.into()));
        }
        set.extend([
            artifact("tsconfig.json", tsconfig()),
            artifact("app/layout.tsx", LAYOUT.into()),
            artifact("app/page.tsx", PAGE.into()),
            artifact("app/globals.css", GLOBALS_CSS.into()),
        ]);
        if full {
            set.push(artifact("lib/utils.ts", UTILS.into()));
            set.push(artifact("lib/design-tokens.ts", DESIGN_TOKENS.into()));
        }

        debug!(count = set.len(), "Shared artifacts selected");
        set
    }
}

fn artifact(path: &str, fallback: String) -> SharedArtifact {
    SharedArtifact {
        path: RelativePath::new(path),
        fallback,
    }
}

fn package_json(template: ScaffoldTemplate) -> String {
    let mut dependencies = json!({
        "next": "^15.0.0",
        "react": "^19.0.0",
        "react-dom": "^19.0.0",
    });
    if template == ScaffoldTemplate::FullProject {
        dependencies["framer-motion"] = json!("^11.0.0");
        dependencies["clsx"] = json!("^2.1.0");
        dependencies["tailwind-merge"] = json!("^2.5.0");
    }

    let manifest = json!({
        "name": format!("atelier-{template}"),
        "version": "0.1.0",
        "private": true,
        "scripts": {
            "dev": "next dev",
            "build": "next build",
            "start": "next start",
        },
        "dependencies": dependencies,
        "devDependencies": {
            "@types/node": "^22.0.0",
            "@types/react": "^19.0.0",
            "tailwindcss": "^3.4.0",
            "postcss": "^8.4.0",
            "autoprefixer": "^10.4.0",
            "typescript": "^5.6.0",
        },
    });
    let mut text = serde_json::to_string_pretty(&manifest).unwrap_or_default();
    text.push('\n');
    text
}

fn tsconfig() -> String {
    let config = json!({
        "compilerOptions": {
            "target": "ES2017",
            "lib": ["dom", "dom.iterable", "esnext"],
            "strict": true,
            "noEmit": true,
            "module": "esnext",
            "moduleResolution": "bundler",
            "jsx": "preserve",
            "incremental": true,
            "plugins": [{ "name": "next" }],
            "paths": { "@/*": ["./*"] },
        },
        "include": ["next-env.d.ts", "**/*.ts", "**/*.tsx"],
        "exclude": ["node_modules"],
    });
    let mut text = serde_json::to_string_pretty(&config).unwrap_or_default();
    text.push('\n');
    text
}

const TAILWIND_CONFIG: &str = r#"import type { Config } from "tailwindcss";

const config: Config = {
  content: ["./app/**/*.{ts,tsx}", "./components/**/*.{ts,tsx}"],
  theme: { extend: {} },
  plugins: [],
};

export default config;
"#;

const NEXT_CONFIG: &str = r#"import type { NextConfig } from "next";

const nextConfig: NextConfig = {};

export default nextConfig;
"#;

const LAYOUT: &str = r#"import "./globals.css";

export default function RootLayout({ children }: { children: React.ReactNode }) {
  return (
    <html lang="en">
      <body>{children}</body>
    </html>
  );
}
"#;

const PAGE: &str = r#"export default function Page() {
  return <main className="min-h-screen" />;
}
"#;

const GLOBALS_CSS: &str = "@tailwind base;\n@tailwind components;\n@tailwind utilities;\n";

const UTILS: &str = r#"import { clsx, type ClassValue } from "clsx";
import { twMerge } from "tailwind-merge";

export function cn(...inputs: ClassValue[]) {
  return twMerge(clsx(inputs));
}
"#;

const DESIGN_TOKENS: &str = r#"export const tokens = {
  colors: {},
  spacing: {},
  radii: {},
} as const;
"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(template: ScaffoldTemplate) -> Vec<String> {
        BuiltinArtifacts::new()
            .artifacts(template)
            .into_iter()
            .map(|a| a.path.to_string())
            .collect()
    }

    #[test]
    fn full_project_has_nine_artifacts() {
        let p = paths(ScaffoldTemplate::FullProject);
        assert_eq!(p.len(), 9);
        assert!(p.contains(&"next.config.ts".to_string()));
        assert!(p.contains(&"lib/design-tokens.ts".to_string()));
    }

    #[test]
    fn minimal_landing_skips_lib_and_next_config() {
        let p = paths(ScaffoldTemplate::MinimalLanding);
        assert_eq!(
            p,
            vec![
                "package.json",
                "tailwind.config.ts",
                "tsconfig.json",
                "app/layout.tsx",
                "app/page.tsx",
                "app/globals.css",
            ]
        );
    }

    #[test]
    fn package_json_is_valid_and_template_specific() {
        let full: serde_json::Value =
            serde_json::from_str(&package_json(ScaffoldTemplate::FullProject)).unwrap();
        assert_eq!(full["name"], "atelier-full-project");
        assert!(full["dependencies"]["framer-motion"].is_string());

        let landing: serde_json::Value =
            serde_json::from_str(&package_json(ScaffoldTemplate::MinimalLanding)).unwrap();
        assert!(landing["dependencies"]["framer-motion"].is_null());
    }
}
