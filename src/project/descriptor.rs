/// Generated project descriptor
///
/// The descriptor is the MSBuild-style project the compiler collaborator
/// restores and builds against:
///
/// ```xml
/// <Project Sdk="Microsoft.NET.Sdk">
///   <PropertyGroup>
///     <OutputType>Exe</OutputType>
///     <TargetFramework>net8.0</TargetFramework>
///     <LangVersion>latest</LangVersion>
///   </PropertyGroup>
///   <ItemGroup>
///     <PackageReference Include="Dapper" Version="2.1.35" />
///   </ItemGroup>
///   <ItemGroup>
///     <Reference Include="System.Xml" />
///   </ItemGroup>
/// </Project>
/// ```
///
/// Descriptors are values: every `with_*` call returns a new descriptor and
/// never mutates a set that another owner can see.
use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use super::error::ProjectError;
use super::reference::{AssemblyReference, PackageReference};

pub const DEFAULT_SDK: &str = "Microsoft.NET.Sdk";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDescriptor {
    sdk: String,
    target_framework: String,
    package_references: BTreeSet<PackageReference>,
    assembly_references: BTreeSet<AssemblyReference>,
}

impl Default for ProjectDescriptor {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectDescriptor {
    /// Empty descriptor with the default SDK and no target framework
    pub fn new() -> Self {
        Self {
            sdk: DEFAULT_SDK.to_string(),
            target_framework: String::new(),
            package_references: BTreeSet::new(),
            assembly_references: BTreeSet::new(),
        }
    }

    pub fn sdk(&self) -> &str {
        &self.sdk
    }

    pub fn target_framework(&self) -> &str {
        &self.target_framework
    }

    pub fn package_references(&self) -> impl ExactSizeIterator<Item = &PackageReference> {
        self.package_references.iter()
    }

    pub fn assembly_references(&self) -> impl ExactSizeIterator<Item = &AssemblyReference> {
        self.assembly_references.iter()
    }

    /// Override the SDK; an empty value keeps the current one
    pub fn with_sdk(mut self, sdk: impl Into<String>) -> Self {
        let sdk = sdk.into();
        if !sdk.is_empty() {
            self.sdk = sdk;
        }
        self
    }

    pub fn with_target_framework(mut self, target_framework: impl Into<String>) -> Self {
        self.target_framework = target_framework.into();
        self
    }

    /// Adding a reference already present is a no-op
    pub fn with_package_reference(mut self, reference: PackageReference) -> Self {
        self.package_references.insert(reference);
        self
    }

    pub fn with_package_references<I>(mut self, references: I) -> Self
    where
        I: IntoIterator<Item = PackageReference>,
    {
        self.package_references.extend(references);
        self
    }

    pub fn with_assembly_reference(mut self, reference: AssemblyReference) -> Self {
        self.assembly_references.insert(reference);
        self
    }

    /// True when every package reference is pinned (vacuously true when empty)
    pub fn is_cacheable(&self) -> bool {
        self.package_references.iter().all(PackageReference::is_pinned)
    }

    /// Package references that block caching
    pub fn floating_references(&self) -> Vec<&PackageReference> {
        self.package_references
            .iter()
            .filter(|r| !r.is_pinned())
            .collect()
    }

    /// Parse a serialized descriptor
    ///
    /// A `PackageReference` without `Include` or `Version`, or a `Reference`
    /// without `Include`, fails the whole parse.
    pub fn parse(xml: &str) -> Result<Self, ProjectError> {
        let document = roxmltree::Document::parse(xml)?;
        let root = document.root_element();
        if !root.has_tag_name("Project") {
            return Err(ProjectError::MissingProjectElement);
        }

        let mut descriptor = Self::new();

        if let Some(sdk) = root.attribute("Sdk") {
            descriptor = descriptor.with_sdk(sdk);
        }

        if let Some(tfm) = root
            .descendants()
            .find(|n| n.has_tag_name("TargetFramework"))
            .and_then(|n| n.text())
        {
            descriptor.target_framework = tfm.trim().to_string();
        }

        for node in root.descendants().filter(|n| n.has_tag_name("PackageReference")) {
            let include = required_attribute(&node, "PackageReference", "Include")?;
            let version = required_attribute(&node, "PackageReference", "Version")?;
            descriptor
                .package_references
                .insert(PackageReference::new(include, version));
        }

        for node in root.descendants().filter(|n| n.has_tag_name("Reference")) {
            let include = required_attribute(&node, "Reference", "Include")?;
            descriptor
                .assembly_references
                .insert(AssemblyReference::new(include));
        }

        Ok(descriptor)
    }

    pub fn load(path: &Path) -> Result<Self, ProjectError> {
        let xml = fs::read_to_string(path).map_err(|source| ProjectError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&xml)
    }

    /// Render the descriptor
    ///
    /// `TargetFramework` is omitted when empty. References are written in
    /// case-insensitive order so identical descriptors render identically.
    pub fn to_xml(&self) -> String {
        let mut xml = String::new();
        let sdk = if self.sdk.is_empty() {
            DEFAULT_SDK
        } else {
            self.sdk.as_str()
        };

        let _ = writeln!(xml, "<Project Sdk=\"{}\">", escape(sdk));
        xml.push_str("  <PropertyGroup>\n");
        xml.push_str("    <OutputType>Exe</OutputType>\n");
        if !self.target_framework.is_empty() {
            let _ = writeln!(
                xml,
                "    <TargetFramework>{}</TargetFramework>",
                escape(&self.target_framework)
            );
        }
        xml.push_str("    <LangVersion>latest</LangVersion>\n");
        xml.push_str("  </PropertyGroup>\n");

        if !self.package_references.is_empty() {
            xml.push_str("  <ItemGroup>\n");
            for reference in &self.package_references {
                let _ = writeln!(
                    xml,
                    "    <PackageReference Include=\"{}\" Version=\"{}\" />",
                    escape(reference.id.as_str()),
                    escape(reference.version.value().unwrap_or(""))
                );
            }
            xml.push_str("  </ItemGroup>\n");
        }

        if !self.assembly_references.is_empty() {
            xml.push_str("  <ItemGroup>\n");
            for reference in &self.assembly_references {
                let _ = writeln!(
                    xml,
                    "    <Reference Include=\"{}\" />",
                    escape(reference.as_str())
                );
            }
            xml.push_str("  </ItemGroup>\n");
        }

        xml.push_str("</Project>\n");
        xml
    }

    /// Write the descriptor to `path`, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<(), ProjectError> {
        let io_err = |source: std::io::Error| ProjectError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(path, self.to_xml()).map_err(io_err)?;

        tracing::debug!(
            operation = "project.save",
            path = %path.display(),
            packages = self.package_references.len(),
            assemblies = self.assembly_references.len(),
            "wrote project descriptor"
        );
        Ok(())
    }
}

fn required_attribute<'a>(
    node: &roxmltree::Node<'a, '_>,
    element: &'static str,
    attribute: &'static str,
) -> Result<&'a str, ProjectError> {
    node.attribute(attribute)
        .ok_or(ProjectError::MissingAttribute { element, attribute })
}

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
