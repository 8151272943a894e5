mod caddy;
mod nginx_combined;
