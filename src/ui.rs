use crate::state::Workspace;

pub fn render_index(workspace: &Workspace) -> String {
    let meta = workspace.section.meta();
    INDEX_HTML
        .replace("{{THEME}}", workspace.theme.as_str())
        .replace("{{SECTION}}", workspace.section.as_str())
        .replace("{{TITLE}}", meta.title)
        .replace("{{DESC}}", meta.desc)
        .replace("{{BREADCRUMB}}", meta.breadcrumb)
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en" data-theme="{{THEME}}" data-section="{{SECTION}}">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Insight Board</title>
  <script src="https://cdn.jsdelivr.net/npm/chart.js"></script>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&display=swap');

    :root {
      --bg: #f4f6fb;
      --surface: #ffffff;
      --ink: #1e293b;
      --muted: #64748b;
      --primary: #6366f1;
      --secondary: #10b981;
      --warning: #f59e0b;
      --danger: #ef4444;
      --border: rgba(30, 41, 59, 0.12);
      --shadow: 0 18px 40px rgba(30, 41, 59, 0.08);
    }

    [data-theme="dark"] {
      --bg: #0f172a;
      --surface: #1e293b;
      --ink: #e2e8f0;
      --muted: #94a3b8;
      --border: rgba(148, 163, 184, 0.18);
      --shadow: 0 18px 40px rgba(2, 6, 23, 0.5);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
    }

    .shell {
      display: grid;
      grid-template-columns: 240px 1fr;
      min-height: 100vh;
    }

    .sidebar {
      background: var(--surface);
      border-right: 1px solid var(--border);
      padding: 28px 18px;
      display: flex;
      flex-direction: column;
      gap: 28px;
    }

    .brand {
      font-size: 1.25rem;
      font-weight: 600;
      letter-spacing: 0.02em;
    }

    .brand span {
      color: var(--primary);
    }

    .sidebar nav {
      display: grid;
      gap: 6px;
    }

    .nav-item {
      appearance: none;
      border: none;
      background: transparent;
      color: var(--muted);
      font: inherit;
      font-weight: 500;
      text-align: left;
      padding: 10px 14px;
      border-radius: 12px;
      cursor: pointer;
      transition: background 150ms ease, color 150ms ease;
    }

    .nav-item:hover {
      color: var(--ink);
      background: rgba(99, 102, 241, 0.08);
    }

    .nav-item.active {
      color: var(--primary);
      background: rgba(99, 102, 241, 0.14);
    }

    .theme-toggle {
      margin-top: auto;
      border: 1px solid var(--border);
      background: transparent;
      color: var(--muted);
      font: inherit;
      padding: 10px 14px;
      border-radius: 12px;
      cursor: pointer;
    }

    .theme-toggle:hover {
      color: var(--ink);
    }

    main {
      padding: 32px 40px 48px;
      display: grid;
      gap: 24px;
      align-content: start;
    }

    .topbar {
      display: flex;
      flex-wrap: wrap;
      align-items: flex-start;
      justify-content: space-between;
      gap: 16px;
    }

    .breadcrumb {
      color: var(--muted);
      font-size: 0.85rem;
      margin-bottom: 8px;
    }

    h1 {
      margin: 0 0 6px;
      font-size: clamp(1.5rem, 3vw, 2rem);
      font-weight: 600;
    }

    #page-desc {
      margin: 0;
      color: var(--muted);
    }

    .header-actions {
      display: flex;
      gap: 8px;
    }

    .header-actions button {
      border: 1px solid var(--border);
      background: var(--surface);
      color: var(--muted);
      font: inherit;
      font-size: 0.9rem;
      padding: 8px 14px;
      border-radius: 10px;
      cursor: pointer;
    }

    .header-actions button:hover {
      color: var(--ink);
    }

    .panel {
      display: none;
    }

    .panel.active {
      display: grid;
      gap: 20px;
    }

    .card {
      background: var(--surface);
      border: 1px solid var(--border);
      border-radius: 18px;
      box-shadow: var(--shadow);
      padding: 24px;
    }

    #drop-zone {
      border: 2px dashed var(--border);
      border-radius: 18px;
      background: var(--surface);
      padding: 64px 24px;
      text-align: center;
      cursor: pointer;
      transition: border-color 150ms ease, background 150ms ease;
    }

    #drop-zone.dragging {
      border-color: var(--primary);
      background: rgba(99, 102, 241, 0.08);
    }

    #drop-zone h2 {
      margin: 0 0 10px;
      font-weight: 600;
    }

    #drop-zone p {
      margin: 0;
      color: var(--muted);
    }

    .loader {
      width: 34px;
      height: 34px;
      margin: 0 auto 14px;
      border: 3px solid var(--border);
      border-top-color: var(--primary);
      border-radius: 50%;
      animation: spin 800ms linear infinite;
    }

    .stat-grid {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(170px, 1fr));
      gap: 14px;
    }

    .stat-card {
      background: var(--surface);
      border: 1px solid var(--border);
      border-radius: 14px;
      padding: 16px;
      display: grid;
      gap: 6px;
    }

    .stat-label {
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.1em;
      color: var(--muted);
    }

    .stat-value {
      font-size: 1.5rem;
      font-weight: 600;
    }

    .table-card {
      overflow-x: auto;
    }

    .table-title {
      display: flex;
      align-items: baseline;
      justify-content: space-between;
      margin-bottom: 12px;
    }

    .table-title h2 {
      margin: 0;
      font-size: 1.1rem;
    }

    #row-count {
      color: var(--muted);
      font-size: 0.9rem;
    }

    table {
      width: 100%;
      border-collapse: collapse;
      font-size: 0.9rem;
    }

    th, td {
      text-align: left;
      padding: 8px 12px;
      border-bottom: 1px solid var(--border);
      white-space: nowrap;
    }

    th {
      color: var(--muted);
      font-weight: 500;
    }

    .null-cell {
      color: var(--danger);
    }

    .field {
      display: grid;
      gap: 6px;
      margin-bottom: 18px;
    }

    .field label {
      font-size: 0.85rem;
      color: var(--muted);
    }

    select {
      background: var(--bg);
      color: var(--ink);
      border: 1px solid var(--border);
      border-radius: 10px;
      padding: 10px 12px;
      font: inherit;
    }

    .btn-primary {
      appearance: none;
      border: none;
      border-radius: 12px;
      background: var(--primary);
      color: white;
      font: inherit;
      font-weight: 600;
      padding: 12px 22px;
      cursor: pointer;
      box-shadow: 0 10px 24px rgba(99, 102, 241, 0.3);
    }

    .btn-primary:disabled {
      opacity: 0.6;
      cursor: wait;
    }

    .chart-grid {
      display: grid;
      grid-template-columns: 2fr 1fr;
      gap: 20px;
    }

    .chart-card {
      background: var(--surface);
      border: 1px solid var(--border);
      border-radius: 18px;
      padding: 20px;
    }

    .chart-card h2 {
      margin: 0 0 14px;
      font-size: 1rem;
      color: var(--muted);
    }

    .chart-main {
      position: relative;
      height: 320px;
    }

    #insights-list {
      display: grid;
      gap: 12px;
    }

    .insight-card {
      background: var(--surface);
      border: 1px solid var(--border);
      border-left: 4px solid var(--primary);
      border-radius: 14px;
      padding: 16px 18px;
    }

    .insight-card[data-kind="stat"] {
      border-left-color: var(--secondary);
    }

    .insight-card[data-kind="warning"] {
      border-left-color: var(--warning);
    }

    .insight-card p {
      margin: 0;
    }

    @keyframes spin {
      to {
        transform: rotate(360deg);
      }
    }

    @media (max-width: 900px) {
      .shell {
        grid-template-columns: 1fr;
      }
      .sidebar {
        flex-direction: row;
        align-items: center;
        overflow-x: auto;
      }
      .sidebar nav {
        display: flex;
      }
      .theme-toggle {
        margin-top: 0;
        margin-left: auto;
      }
      .chart-grid {
        grid-template-columns: 1fr;
      }
      main {
        padding: 24px 18px 40px;
      }
    }
  </style>
</head>
<body>
  <div class="shell">
    <aside class="sidebar">
      <div class="brand">Insight <span>Board</span></div>
      <nav>
        <button class="nav-item" type="button" data-target="upload">Data Source</button>
        <button class="nav-item" type="button" data-target="preview">Data Preview</button>
        <button class="nav-item" type="button" data-target="analysis">Configure</button>
        <button class="nav-item" type="button" data-target="results">Visualizations</button>
        <button class="nav-item" type="button" data-target="insights">Insights</button>
      </nav>
      <button class="theme-toggle" type="button" id="theme-toggle">Light / Dark</button>
    </aside>

    <main>
      <header class="topbar">
        <div>
          <div class="breadcrumb">Workspace / <span id="breadcrumb-current">{{BREADCRUMB}}</span></div>
          <h1 id="page-title">{{TITLE}}</h1>
          <p id="page-desc">{{DESC}}</p>
        </div>
        <div class="header-actions">
          <button type="button" id="reset-btn">Reset</button>
          <button type="button" id="export-btn">Export</button>
          <button type="button" id="share-btn">Share</button>
        </div>
      </header>

      <section class="panel" data-section="upload">
        <div id="drop-zone">
          <h2>Drag and drop your dataset here</h2>
          <p>Or click to browse. CSV and JSON files are supported.</p>
        </div>
        <input type="file" id="file-input" accept=".csv,.json" hidden />
      </section>

      <section class="panel" data-section="preview">
        <div class="stat-grid" id="data-stats"></div>
        <div class="card table-card">
          <div class="table-title">
            <h2>Sample rows</h2>
            <span id="row-count"></span>
          </div>
          <table id="preview-table"></table>
        </div>
      </section>

      <section class="panel" data-section="analysis">
        <div class="card">
          <div class="field">
            <label for="analysis-type">Analysis type</label>
            <select id="analysis-type">
              <option value="descriptive">Descriptive Statistics</option>
              <option value="clustering">Clustering (K-Means)</option>
              <option value="prediction">Prediction (Linear Regression)</option>
              <option value="correlation">Correlation Analysis</option>
              <option value="trend">Trend Detection</option>
            </select>
          </div>
          <div class="field">
            <label for="viz-type">Visualization preference</label>
            <select id="viz-type">
              <option value="auto">Auto (recommended)</option>
              <option value="distribution">Distribution</option>
              <option value="relational">Relational</option>
              <option value="hierarchical">Hierarchical</option>
              <option value="categorical">Categorical</option>
            </select>
          </div>
          <button class="btn-primary" type="button" id="run-analysis-btn">Run Adaptive Analysis</button>
        </div>
      </section>

      <section class="panel" data-section="results">
        <div class="chart-grid">
          <div class="chart-card">
            <h2>Primary view</h2>
            <div class="chart-main"><canvas id="main-chart"></canvas></div>
          </div>
          <div class="chart-card">
            <h2>Top segments</h2>
            <canvas id="dist-chart"></canvas>
          </div>
        </div>
      </section>

      <section class="panel" data-section="insights">
        <div id="insights-list"></div>
      </section>
    </main>
  </div>

  <script>
    const CHART_TYPES = {
      'bar': 'bar',
      'pie': 'pie',
      'line': 'line',
      'doughnut': 'doughnut',
      'polar-area': 'polarArea'
    };
    const PALETTE = ['#6366f1', '#ec4899', '#8b5cf6', '#10b981', '#f59e0b'];

    const html = document.documentElement;
    const navItems = Array.from(document.querySelectorAll('.nav-item'));
    const panels = Array.from(document.querySelectorAll('.panel'));
    const dropZone = document.getElementById('drop-zone');
    const fileInput = document.getElementById('file-input');
    const pageTitle = document.getElementById('page-title');
    const pageDesc = document.getElementById('page-desc');
    const breadcrumbCurrent = document.getElementById('breadcrumb-current');
    const statsGrid = document.getElementById('data-stats');
    const rowCount = document.getElementById('row-count');
    const previewTable = document.getElementById('preview-table');
    const runBtn = document.getElementById('run-analysis-btn');
    const insightsList = document.getElementById('insights-list');

    let sessionId = null;
    let mainChart = null;
    let distChart = null;

    const applySection = (section, meta) => {
      html.setAttribute('data-section', section);
      panels.forEach((panel) => panel.classList.toggle('active', panel.dataset.section === section));
      navItems.forEach((item) => item.classList.toggle('active', item.dataset.target === section));
      pageTitle.innerText = meta.title;
      pageDesc.innerText = meta.desc;
      breadcrumbCurrent.innerText = meta.breadcrumb;
    };

    const navigate = async (section) => {
      const res = await fetch('/api/navigate', {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify({ section })
      });
      if (!res.ok) {
        alert(await res.text());
        return;
      }
      const data = await res.json();
      applySection(data.section, data.meta);
    };

    navItems.forEach((item) => {
      item.addEventListener('click', () => navigate(item.dataset.target));
    });

    const resetUploadZone = () => {
      dropZone.innerHTML = '<h2>Drag and drop your dataset here</h2>' +
        '<p>Or click to browse. CSV and JSON files are supported.</p>';
    };

    const handleFileUpload = async (file) => {
      const formData = new FormData();
      formData.append('file', file);
      dropZone.innerHTML = '<div class="loader"></div><p>Processing ' + file.name + '...</p>';

      try {
        const res = await fetch('/api/upload', { method: 'POST', body: formData });
        const data = await res.json();
        if (data.status !== 'success') {
          throw new Error(data.detail || 'Upload failed');
        }
        sessionId = data.session_id;
        renderSummary(data.summary);
        resetUploadZone();
        await navigate('preview');
      } catch (error) {
        alert('Error: ' + error.message);
        resetUploadZone();
      }
    };

    dropZone.addEventListener('click', () => fileInput.click());
    dropZone.addEventListener('dragover', (e) => {
      e.preventDefault();
      dropZone.classList.add('dragging');
    });
    dropZone.addEventListener('dragleave', () => dropZone.classList.remove('dragging'));
    dropZone.addEventListener('drop', (e) => {
      e.preventDefault();
      dropZone.classList.remove('dragging');
      if (e.dataTransfer.files.length) handleFileUpload(e.dataTransfer.files[0]);
    });
    fileInput.addEventListener('change', (e) => {
      if (e.target.files.length) handleFileUpload(e.target.files[0]);
    });

    const statCard = (label, value) =>
      '<div class="stat-card"><span class="stat-label">' + label +
      '</span><span class="stat-value">' + value + '</span></div>';

    const renderSummary = (summary) => {
      const missing = Object.values(summary.missing_values).reduce((a, b) => a + b, 0);
      statsGrid.innerHTML =
        statCard('Total Records', summary.shape[0].toLocaleString()) +
        statCard('Features', summary.shape[1]) +
        statCard('Missing Values', missing) +
        statCard('Data Types', 'Mixed');
      rowCount.innerText = summary.shape[0].toLocaleString() + ' Rows';

      let tableHtml = '<thead><tr>';
      summary.columns.forEach((h) => { tableHtml += '<th>' + h + '</th>'; });
      tableHtml += '</tr></thead><tbody>';
      summary.preview.forEach((row) => {
        tableHtml += '<tr>';
        summary.columns.forEach((h) => {
          const val = row[h];
          tableHtml += '<td>' + (val === null || val === undefined
            ? '<span class="null-cell">null</span>'
            : val) + '</td>';
        });
        tableHtml += '</tr>';
      });
      tableHtml += '</tbody>';
      previewTable.innerHTML = tableHtml;
    };

    runBtn.addEventListener('click', async () => {
      runBtn.disabled = true;
      runBtn.innerText = 'Analyzing...';

      try {
        const res = await fetch('/api/analyze', {
          method: 'POST',
          headers: { 'content-type': 'application/json' },
          body: JSON.stringify({
            type: document.getElementById('analysis-type').value,
            viz: document.getElementById('viz-type').value,
            session_id: sessionId
          })
        });

        const contentType = res.headers.get('content-type');
        if (!contentType || contentType.indexOf('application/json') === -1) {
          const text = await res.text();
          throw new Error(text || 'Server returned an unexpected response format');
        }

        const data = await res.json();
        if (data.status !== 'success') {
          throw new Error(data.message || 'Analysis failed');
        }

        renderCharts(data.charts);
        renderInsights(data.analysis.insights);
        await navigate('results');
      } catch (error) {
        alert('Analytical Error: ' + error.message);
      } finally {
        runBtn.disabled = false;
        runBtn.innerText = 'Run Adaptive Analysis';
      }
    });

    const renderCharts = (charts) => {
      if (mainChart) mainChart.destroy();
      if (distChart) distChart.destroy();

      const primaryType = CHART_TYPES[charts.primary.kind] || 'bar';
      const radial = primaryType === 'pie' || primaryType === 'polarArea';

      mainChart = new Chart(document.getElementById('main-chart'), {
        type: primaryType,
        data: {
          labels: charts.primary.labels,
          datasets: [{
            label: 'Primary Metric',
            data: charts.primary.values,
            borderColor: '#6366f1',
            backgroundColor: primaryType === 'line' ? 'rgba(99, 102, 241, 0.2)' : PALETTE,
            tension: 0.4,
            fill: primaryType === 'line'
          }]
        },
        options: {
          responsive: true,
          maintainAspectRatio: false,
          plugins: {
            legend: { display: radial, labels: { color: '#94a3b8' } }
          },
          scales: radial ? {} : {
            y: { beginAtZero: true, grid: { color: 'rgba(148, 163, 184, 0.1)' }, border: { display: false } },
            x: { grid: { display: false }, border: { display: false } }
          }
        }
      });

      distChart = new Chart(document.getElementById('dist-chart'), {
        type: 'doughnut',
        data: {
          labels: charts.secondary.labels,
          datasets: [{
            data: charts.secondary.values,
            backgroundColor: PALETTE.slice(0, 3),
            borderWidth: 0
          }]
        },
        options: {
          responsive: true,
          plugins: {
            legend: { position: 'bottom', labels: { color: '#94a3b8' } }
          },
          cutout: '70%'
        }
      });
    };

    const renderInsights = (insights) => {
      insightsList.innerHTML = insights.map((ins) =>
        '<div class="insight-card" data-kind="' + ins.type + '"><p>' + ins.text + '</p></div>'
      ).join('');
    };

    document.getElementById('reset-btn').addEventListener('click', async () => {
      if (confirm('Are you sure you want to clear all data and reset the system?')) {
        await fetch('/api/reset', { method: 'POST' });
        location.reload();
      }
    });

    document.getElementById('export-btn').addEventListener('click', () => window.print());

    document.getElementById('share-btn').addEventListener('click', () => {
      navigator.clipboard.writeText(window.location.href).then(() => {
        alert('Analysis link copied to clipboard!');
      });
    });

    document.getElementById('theme-toggle').addEventListener('click', async () => {
      const next = html.getAttribute('data-theme') === 'light' ? 'dark' : 'light';
      const res = await fetch('/api/theme', {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify({ theme: next })
      });
      if (res.ok) {
        html.setAttribute('data-theme', next);
      }
    });

    const loadWorkspace = async () => {
      const res = await fetch('/api/workspace');
      if (!res.ok) {
        return;
      }
      const data = await res.json();
      sessionId = data.session_id;
      if (data.dataset) {
        renderSummary(data.dataset);
      }
      if (data.report) {
        renderCharts(data.report.charts);
        renderInsights(data.report.analysis.insights);
      }
      applySection(data.section, data.meta);
    };

    applySection('{{SECTION}}', {
      title: '{{TITLE}}',
      desc: '{{DESC}}',
      breadcrumb: '{{BREADCRUMB}}'
    });
    loadWorkspace();
  </script>
</body>
</html>
"#;
