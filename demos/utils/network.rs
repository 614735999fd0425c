use std::io;
use std::net::Ipv4Addr;
use std::process::Command;

pub fn configure_interface(iface_name: &str, ip_cidr: &str) -> io::Result<()> {
    // Configure IP address: ip addr add <ip_cidr> dev <iface_name>
    run_ip(&["addr", "add", ip_cidr, "dev", iface_name])?;

    // Bring interface up: ip link set up dev <iface_name>
    run_ip(&["link", "set", "up", "dev", iface_name])?;

    log::info!(
        "Interface {} configured with IP {} and brought up",
        iface_name,
        ip_cidr
    );
    Ok(())
}

fn run_ip(args: &[&str]) -> io::Result<()> {
    let status = Command::new("ip").args(args).status()?;
    if !status.success() {
        return Err(io::Error::new(
            io::ErrorKind::Other,
            format!("`ip {}` failed with {}", args.join(" "), status),
        ));
    }
    Ok(())
}

pub fn parse_ipv4(addr: &str) -> io::Result<[u8; 4]> {
    addr.parse::<Ipv4Addr>()
        .map(|ip| ip.octets())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))
}
