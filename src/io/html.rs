// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Standalone HTML viewer page backed by vtk.js

use quick_xml::escape::escape;

const VTKJS_CDN: &str = "https://unpkg.com/vtk.js";

/// Render the viewer page for `scene_name`.
///
/// With `bundle` set, the page fetches that scene bundle and adds one actor
/// per object; otherwise it renders an empty viewport.
pub fn viewer_html(scene_name: &str, bundle: Option<&str>) -> String {
    let title = escape(scene_name);
    let bundle_literal = match bundle {
        Some(path) => js_string(path),
        None => "null".to_string(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{title} - VTK Viewer</title>
  <script src="{VTKJS_CDN}"></script>
  <style>
    html, body {{ margin: 0; height: 100%; background: #1e1e1e; color: #ddd; font-family: sans-serif; }}
    #viewport {{ width: 100%; height: 100%; }}
    #banner {{ position: absolute; top: 8px; left: 12px; }}
  </style>
</head>
<body>
  <div id="banner">{title}</div>
  <div id="viewport"></div>
  <script>
    const bundleUrl = {bundle_literal};
    const fullScreen = vtk.Rendering.Misc.vtkFullScreenRenderWindow.newInstance({{
      rootContainer: document.getElementById('viewport'),
      background: [0.12, 0.12, 0.12],
    }});
    const renderer = fullScreen.getRenderer();
    const renderWindow = fullScreen.getRenderWindow();

    function addObject(object) {{
      const polyData = vtk.Common.DataModel.vtkPolyData.newInstance();
      polyData.getPoints().setData(Float64Array.from(object.points), 3);
      const pack = (cells) => Uint32Array.from(cells.flatMap((c) => [c.length, ...c]));
      polyData.getLines().setData(pack(object.lines));
      polyData.getPolys().setData(pack(object.polys));
      if (object.colors) {{
        polyData.getPointData().setScalars(vtk.Common.Core.vtkDataArray.newInstance({{
          name: 'Colors', numberOfComponents: 4, values: Uint8Array.from(object.colors),
        }}));
      }}
      const mapper = vtk.Rendering.Core.vtkMapper.newInstance({{
        scalarVisibility: Boolean(object.colors),
        colorMode: 0,
      }});
      mapper.setInputData(polyData);
      const actor = vtk.Rendering.Core.vtkActor.newInstance();
      actor.setMapper(mapper);
      actor.getProperty().setColor(...object.material.color);
      actor.getProperty().setOpacity(object.material.opacity);
      actor.getProperty().setRepresentationToSurface();
      if (object.material.representation === 'wireframe') {{
        actor.getProperty().setRepresentationToWireframe();
      }} else if (object.material.representation === 'points') {{
        actor.getProperty().setRepresentationToPoints();
      }}
      renderer.addActor(actor);
    }}

    if (bundleUrl) {{
      fetch(bundleUrl)
        .then((response) => response.json())
        .then((bundle) => {{
          bundle.objects.forEach(addObject);
          renderer.resetCamera();
          renderWindow.render();
        }})
        .catch((err) => {{
          document.getElementById('banner').textContent += ' (failed to load scene: ' + err + ')';
        }});
    }} else {{
      document.getElementById('banner').textContent += ' (no data bound)';
      renderWindow.render();
    }}
  </script>
</body>
</html>
"#
    )
}

/// Quote `value` as a JavaScript string literal that is safe inside `<script>`
fn js_string(value: &str) -> String {
    let quoted = serde_json::Value::String(value.to_string()).to_string();
    quoted.replace("</", "<\\/")
}
