//! Static portfolio commands: contact, skills, aboutme, projects.

use termfolio_types::error::Result;

use crate::interpreter::{Command, CommandOutput, CommandRegistry, Environment};

/// Register the portfolio information commands.
pub fn register_profile_commands(reg: &mut CommandRegistry) {
    reg.register(Box::new(ContactCmd));
    reg.register(Box::new(SkillsCmd));
    reg.register(Box::new(AboutMeCmd));
    reg.register(Box::new(ProjectsCmd));
}

pub(crate) struct Project {
    pub title: &'static str,
    pub date: &'static str,
    pub summary: &'static str,
    pub technologies: &'static [&'static str],
    pub github: Option<&'static str>,
}

pub(crate) const PROJECTS: &[Project] = &[
    Project {
        title: "Web Application Attacks Tester",
        date: "October 2024 - January 2025",
        summary: "Tests web application security against attack scenarios written as readable YAML files.",
        technologies: &["NextJS", "Python", "PostgreSQL", "Docker", "YAML", "OWASP"],
        github: Some("https://github.com/TugdualDek/projet-secu-logicielle"),
    },
    Project {
        title: "PDF Chorale SGP",
        date: "September 2024",
        summary: "Manages songs and programmes for the SGP choir and generates programme PDFs.",
        technologies: &["NextJS", "Prisma", "PostgreSQL", "Docker"],
        github: None,
    },
    Project {
        title: "Trade Invest",
        date: "2023",
        summary: "Fictitious trading platform with real US market rates for the IsepInvest InvestDay contest.",
        technologies: &["Next.js", "Prisma", "PostgreSQL", "Docker"],
        github: Some("https://github.com/TugdualDek/InvestDay"),
    },
    Project {
        title: "Carmen",
        date: "2023",
        summary: "First-year ISEP engineering project helping hospitals, from sensors and gateways to a website.",
        technologies: &["HTML", "CSS", "JavaScript", "PHP", "SQL"],
        github: Some("https://github.com/naro92/Carmen"),
    },
    Project {
        title: "Weather APP",
        date: "2022",
        summary: "Displays temperatures from a DHT11 sensor through a Python API in a Flutter app.",
        technologies: &["Flutter", "Python", "Arduino", "RaspberryPi"],
        github: Some("https://github.com/Sh0lf/IT-Project-Weather-App"),
    },
    Project {
        title: "Book where you are the hero",
        date: "2021",
        summary: "Python game to write, save, share and play choose-your-own-adventure stories.",
        technologies: &["Python"],
        github: Some("https://github.com/arcreane/jeu-de-role-rasputin"),
    },
];

/// `(date, title)` pairs, most recent first.
pub(crate) const EXPERIENCE: &[(&str, &str)] = &[
    ("September 2023 - present", "System, network and security administrator at Bilendi Technology"),
    ("May 2023 - May 2024", "Technical manager at JuniorISEP"),
    ("October 2021 - July 2024", "Developer at IsepInvest"),
    ("2020 - 2025", "Student at ISEP - School of engineering (Cybersecurity and Networks)"),
    ("February 2022 - June 2022", "Erasmus exchange at CVUT - Czech Technical University in Prague"),
    ("June 2021 - July 2021", "Internship at Adamantia"),
];

struct ContactCmd;
impl Command for ContactCmd {
    fn name(&self) -> &str {
        "contact"
    }
    fn description(&self) -> &str {
        "Contact me"
    }
    fn usage(&self) -> &str {
        "contact"
    }
    fn execute(&self, _args: &[&str], _env: &mut Environment<'_>) -> Result<CommandOutput> {
        Ok(CommandOutput::Text(
            "Email: tugdualk@hotmail.com\n\
             LinkedIn: https://www.linkedin.com/in/tugdual-de-kerdrel/\n\
             CV: https://tugdual.com/assets/cv.pdf"
                .to_string(),
        ))
    }
}

struct SkillsCmd;
impl Command for SkillsCmd {
    fn name(&self) -> &str {
        "skills"
    }
    fn description(&self) -> &str {
        "Display my skills"
    }
    fn usage(&self) -> &str {
        "skills"
    }
    fn execute(&self, _args: &[&str], _env: &mut Environment<'_>) -> Result<CommandOutput> {
        const SKILLS: [(&str, &str); 6] = [
            ("Languages", "HTML, JavaScript, TypeScript, Python, Java, SQL, PHP"),
            ("Frontend", "React, Next.js, Remix.js, Tailwind CSS, HTML, CSS"),
            ("Backend", "Node.js, Next.js, Flask, Spring Boot, Nest.js"),
            ("Databases", "MySQL, PostgreSQL"),
            ("DevOps", "Docker, LXC, GitLab CI"),
            ("Tools", "Raspberry-pi, Arduino, SDR, ZimaBoard"),
        ];
        let lines: Vec<String> = SKILLS
            .iter()
            .map(|(area, list)| format!("{:<11}{list}", format!("{area}:")))
            .collect();
        Ok(CommandOutput::Text(lines.join("\n")))
    }
}

struct AboutMeCmd;
impl Command for AboutMeCmd {
    fn name(&self) -> &str {
        "aboutme"
    }
    fn description(&self) -> &str {
        "About me"
    }
    fn usage(&self) -> &str {
        "aboutme"
    }
    fn execute(&self, _args: &[&str], _env: &mut Environment<'_>) -> Result<CommandOutput> {
        Ok(CommandOutput::Text(
            "About me\n\
             Name: Tugdual AUDREN de KERDREL\n\
             Role: System Administrator at Bilendi\n\
             I'm a final-year engineering student at ISEP, specializing in cybersecurity and networks.\n\
             Passionate about information systems security, I combine technical expertise and \
             curiosity to meet the challenges of cybersecurity.\n\
             Experience in web development and a strong interest in artificial intelligence."
                .to_string(),
        ))
    }
}

struct ProjectsCmd;
impl Command for ProjectsCmd {
    fn name(&self) -> &str {
        "projects"
    }
    fn description(&self) -> &str {
        "List of projects"
    }
    fn usage(&self) -> &str {
        "projects"
    }
    fn execute(&self, _args: &[&str], _env: &mut Environment<'_>) -> Result<CommandOutput> {
        let mut out = String::from("Projects:");
        for p in PROJECTS {
            out.push_str(&format!("\n  {:<32} {}", p.title, p.date));
        }
        out.push_str("\n\nSome details are only available to those who dig deeper...");
        Ok(CommandOutput::Text(out))
    }
}

#[cfg(test)]
mod tests {
    use crate::testutil::Harness;

    #[test]
    fn contact_lists_email_and_linkedin() {
        let mut h = Harness::new();
        let out = h.ok("contact");
        assert!(out.contains("tugdualk@hotmail.com"));
        assert!(out.contains("linkedin.com/in/tugdual-de-kerdrel"));
    }

    #[test]
    fn skills_has_one_line_per_area() {
        let mut h = Harness::new();
        let out = h.ok("skills");
        assert_eq!(out.lines().count(), 6);
        assert!(out.lines().next().unwrap().starts_with("Languages: HTML"));
        assert!(out.contains("DevOps:    Docker, LXC, GitLab CI"));
    }

    #[test]
    fn aboutme_names_the_author() {
        let mut h = Harness::new();
        assert!(h.ok("aboutme").contains("Tugdual AUDREN de KERDREL"));
    }

    #[test]
    fn projects_lists_every_title() {
        let mut h = Harness::new();
        let out = h.ok("projects");
        for p in super::PROJECTS {
            assert!(out.contains(p.title), "{}", p.title);
        }
        assert!(!out.contains("github.com"));
    }

    #[test]
    fn profile_commands_ignore_arguments() {
        let mut h = Harness::new();
        assert_eq!(h.ok("contact extra args"), h.ok("contact"));
    }
}
